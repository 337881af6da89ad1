use std::fmt;

/// Exact `(group, artifact, version)` identity of a module or dependency.
///
/// Equality is case-sensitive on all three parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordinateKey {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl CoordinateKey {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Parse `"group:artifact:version"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(g), Some(a), Some(v), None) if !g.is_empty() && !a.is_empty() => {
                Some(Self::new(g, a, v))
            }
            _ => None,
        }
    }
}

impl fmt::Display for CoordinateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}
