use std::collections::BTreeSet;

/// Artifact identifiers left untouched for a whole run.
///
/// Built once from configuration and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    artifact_ids: BTreeSet<String>,
}

impl ExclusionSet {
    /// Parse a comma-separated list such as `"core, api"`. Blank entries are ignored.
    pub fn from_csv(list: &str) -> Self {
        list.split(',').collect()
    }

    pub fn is_excluded(&self, artifact_id: &str) -> bool {
        self.artifact_ids.contains(artifact_id)
    }

    pub fn is_empty(&self) -> bool {
        self.artifact_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.artifact_ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.artifact_ids.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            artifact_ids: iter
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}
