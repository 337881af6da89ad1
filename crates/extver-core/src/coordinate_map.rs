//! Old-coordinate to new-version index built during version resolution.
//!
//! [`CoordinateMapBuilder`] accepts insertions while versions are being
//! resolved. [`CoordinateMapBuilder::freeze`] consumes it and yields a
//! read-only [`CoordinateMap`], so nothing can be added once rewriting starts.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::coordinate::CoordinateKey;
use crate::exclusion::ExclusionSet;
use crate::module::Module;
use crate::version::VersionChange;

/// How an entry entered the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySource {
    /// The module's own resolved version.
    Direct,
    /// A dependency declared at its containing module's old version.
    Inferred,
}

/// Accumulates coordinate entries. First writer wins for every key.
#[derive(Debug, Default)]
pub struct CoordinateMapBuilder {
    entries: BTreeMap<CoordinateKey, String>,
}

/// Frozen coordinate index, read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoordinateMap {
    entries: BTreeMap<CoordinateKey, String>,
}

impl CoordinateMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `key -> new_version` unless the key is already present.
    ///
    /// Returns `true` when the entry was added.
    pub fn insert(&mut self, key: CoordinateKey, new_version: &str, source: EntrySource) -> bool {
        match self.entries.entry(key) {
            Entry::Vacant(slot) => {
                tracing::debug!(
                    "coordinate map ({source:?}): {} -> {new_version}",
                    slot.key()
                );
                slot.insert(new_version.to_string());
                true
            }
            Entry::Occupied(existing) => {
                if existing.get() != new_version {
                    tracing::warn!(
                        "{} already maps to {}; ignoring {source:?} entry {new_version}",
                        existing.key(),
                        existing.get()
                    );
                }
                false
            }
        }
    }

    /// Record a resolved module: its own coordinate plus every dependency that
    /// mirrors the module's old version.
    ///
    /// Excluded modules contribute nothing, and dependencies on excluded
    /// artifacts are never inferred.
    pub fn record_module(
        &mut self,
        module: &Module,
        change: &VersionChange,
        exclusions: &ExclusionSet,
    ) {
        if exclusions.is_excluded(&module.artifact_id) {
            return;
        }
        self.insert(
            module.coordinate_at(&change.old),
            &change.new,
            EntrySource::Direct,
        );

        for dependency in &module.dependencies {
            if exclusions.is_excluded(&dependency.artifact_id) {
                continue;
            }
            let Some(key) = dependency.coordinate() else {
                continue;
            };
            if key.version.eq_ignore_ascii_case(&change.old) {
                self.insert(key, &change.new, EntrySource::Inferred);
            }
        }
    }

    pub fn contains(&self, key: &CoordinateKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish the build phase.
    pub fn freeze(self) -> CoordinateMap {
        CoordinateMap {
            entries: self.entries,
        }
    }
}

impl CoordinateMap {
    /// New version for an old coordinate.
    pub fn get(&self, key: &CoordinateKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &CoordinateKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (&CoordinateKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }
}
