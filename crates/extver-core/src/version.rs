//! Pre-release (snapshot) version rules.
//!
//! Detection is textual: a version is a pre-release when it ends with
//! `SNAPSHOT` or carries a deployed-snapshot timestamp such as
//! `1.0-20240105.101530-7`. No semantic version parsing happens here.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Marker that identifies a pre-release version.
pub const SNAPSHOT_MARKER: &str = "SNAPSHOT";

/// Suffix appended to keep a pre-release version a pre-release.
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

static TIMESTAMPED_SNAPSHOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*)-(\d{8}\.\d{6})-(\d+)$").expect("hardcoded regex must compile")
});

/// Whether `version` denotes a pre-release build. The marker is matched
/// ignoring case.
pub fn is_pre_release(version: &str) -> bool {
    ends_with_marker(version) || TIMESTAMPED_SNAPSHOT.is_match(version)
}

fn ends_with_marker(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() >= SNAPSHOT_MARKER.len()
        && bytes[bytes.len() - SNAPSHOT_MARKER.len()..]
            .eq_ignore_ascii_case(SNAPSHOT_MARKER.as_bytes())
}

/// Remove the first `-SNAPSHOT` occurrence from `version`.
pub fn strip_pre_release_once(version: &str) -> String {
    version.replacen(SNAPSHOT_SUFFIX, "", 1)
}

/// Keep pre-release status across a version change.
///
/// When `old` was a pre-release and `new` is not, the canonical suffix is
/// appended exactly once.
pub fn carry_pre_release(old: &str, new: &str) -> String {
    if is_pre_release(old) && !is_pre_release(new) {
        format!("{new}{SNAPSHOT_SUFFIX}")
    } else {
        new.to_string()
    }
}

/// A module's version before and after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionChange {
    pub old: String,
    pub new: String,
}

impl VersionChange {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }

    /// True when resolution produced the version the module already had.
    pub fn is_noop(&self) -> bool {
        self.old == self.new
    }

    /// Case-insensitive match against the old version, the comparison used for
    /// version entries inside build step configuration.
    pub fn matches_old(&self, value: &str) -> bool {
        value.eq_ignore_ascii_case(&self.old)
    }
}

impl fmt::Display for VersionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.old, self.new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_suffix_detected() {
        assert!(is_pre_release("1.0-SNAPSHOT"));
        assert!(is_pre_release("SNAPSHOT"));
        assert!(!is_pre_release("1.0"));
        assert!(is_pre_release("1.0-snapshot"));
        assert!(is_pre_release("1.0-Snapshot"));
        assert!(!is_pre_release("1.0-SNAPSHOTS"));
        assert!(!is_pre_release("shot"));
    }

    #[test]
    fn timestamped_snapshot_detected() {
        assert!(is_pre_release("1.0-20240105.101530-7"));
        assert!(!is_pre_release("1.0-2024.1-7"));
    }

    #[test]
    fn strip_only_first_occurrence() {
        assert_eq!(strip_pre_release_once("1.0-SNAPSHOT"), "1.0");
        assert_eq!(
            strip_pre_release_once("1.0-SNAPSHOT-SNAPSHOT"),
            "1.0-SNAPSHOT"
        );
        assert_eq!(strip_pre_release_once("1.0"), "1.0");
    }

    #[test]
    fn carry_appends_once() {
        assert_eq!(carry_pre_release("1.0-SNAPSHOT", "2.0"), "2.0-SNAPSHOT");
        assert_eq!(
            carry_pre_release("1.0-SNAPSHOT", "2.0-SNAPSHOT"),
            "2.0-SNAPSHOT"
        );
        assert_eq!(carry_pre_release("1.0", "2.0"), "2.0");
        assert_eq!(carry_pre_release("1.0", "2.0-SNAPSHOT"), "2.0-SNAPSHOT");
    }

    #[test]
    fn carry_ignores_marker_case() {
        assert_eq!(carry_pre_release("1.0-SNAPSHOT", "2.0-snapshot"), "2.0-snapshot");
        assert_eq!(carry_pre_release("1.0-snapshot", "2.0"), "2.0-SNAPSHOT");
    }

    #[test]
    fn version_change_matches_old_ignoring_case() {
        let change = VersionChange::new("1.0-SNAPSHOT", "2.0-SNAPSHOT");
        assert!(change.matches_old("1.0-snapshot"));
        assert!(!change.matches_old("2.0-SNAPSHOT"));
        assert_eq!(change.to_string(), "1.0-SNAPSHOT -> 2.0-SNAPSHOT");
    }
}
