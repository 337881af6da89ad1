//! Operation: resolve one module's new version through a strategy.

use extver_core::module::Module;
use extver_core::version::{carry_pre_release, VersionChange};
use extver_strategy::VersionStrategy;
use extver_util::errors::{ExtverError, ExtverResult};

/// Ask `strategy` for the module's new version.
///
/// The raw value is trimmed. A pre-release module stays a pre-release: when
/// the old version was a snapshot and the new one is not, `-SNAPSHOT` is
/// appended. An empty result is an error rather than a cleared version.
pub fn resolve_version(
    strategy: &dyn VersionStrategy,
    module: &Module,
) -> ExtverResult<VersionChange> {
    let old = module.version.clone();
    let raw = strategy.resolve_version(module)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ExtverError::StrategyExecution {
            module: module.to_string(),
            strategy: strategy.hint().to_string(),
            message: "no version produced".to_string(),
        }
        .into());
    }
    let new = carry_pre_release(&old, trimmed);
    Ok(VersionChange::new(old, new))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl VersionStrategy for Fixed {
        fn hint(&self) -> &'static str {
            "fixed"
        }

        fn resolve_version(&self, _module: &Module) -> ExtverResult<String> {
            Ok(self.0.to_string())
        }
    }

    fn module(version: &str) -> Module {
        Module::new("g", "a1", version, "/w/pom.xml")
    }

    #[test]
    fn snapshot_is_carried() {
        let change = resolve_version(&Fixed("2.0"), &module("1.0-SNAPSHOT")).unwrap();
        assert_eq!(change, VersionChange::new("1.0-SNAPSHOT", "2.0-SNAPSHOT"));
    }

    #[test]
    fn output_is_trimmed() {
        let change = resolve_version(&Fixed("  2.0 \n"), &module("1.0")).unwrap();
        assert_eq!(change.new, "2.0");
    }

    #[test]
    fn snapshot_is_not_doubled() {
        let change = resolve_version(&Fixed("2.0-SNAPSHOT"), &module("1.0-SNAPSHOT")).unwrap();
        assert_eq!(change.new, "2.0-SNAPSHOT");
    }

    #[test]
    fn lowercase_snapshot_is_not_doubled() {
        let change = resolve_version(&Fixed("2.0-snapshot"), &module("1.0-SNAPSHOT")).unwrap();
        assert_eq!(change.new, "2.0-snapshot");
    }

    #[test]
    fn lowercase_snapshot_module_stays_pre_release() {
        let change = resolve_version(&Fixed("2.0"), &module("1.0-snapshot")).unwrap();
        assert_eq!(change.new, "2.0-SNAPSHOT");
    }

    #[test]
    fn blank_output_fails() {
        let err = resolve_version(&Fixed("   "), &module("1.0")).unwrap_err();
        assert!(err.to_string().contains("Strategy 'fixed' failed for g:a1:1.0"));
    }
}
