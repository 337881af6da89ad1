use std::collections::BTreeMap;

use extver_core::module::Module;
use extver_strategy::sysprop::{SystemPropertyStrategy, QUALIFIER_PROPERTY, VERSION_PROPERTY};
use extver_strategy::VersionStrategy;

fn module() -> Module {
    Module::new("g", "a1", "1.0-SNAPSHOT", "/w/a1/pom.xml")
}

#[test]
fn test_sysprop_defaults_to_current_version() {
    let strategy = SystemPropertyStrategy::default();
    assert_eq!(strategy.resolve_version(&module()).unwrap(), "1.0-SNAPSHOT");
}

#[test]
fn test_sysprop_override() {
    let strategy = SystemPropertyStrategy {
        version: Some("3.1".to_string()),
        qualifier: None,
    };
    assert_eq!(strategy.resolve_version(&module()).unwrap(), "3.1");
}

#[test]
fn test_sysprop_qualifier_replaces_snapshot_once() {
    let strategy = SystemPropertyStrategy {
        version: None,
        qualifier: Some("build42".to_string()),
    };
    assert_eq!(strategy.resolve_version(&module()).unwrap(), "1.0-build42");
}

#[test]
fn test_sysprop_reads_defines_and_trims_qualifier() {
    let mut defines = BTreeMap::new();
    defines.insert(VERSION_PROPERTY.to_string(), "2.0-SNAPSHOT".to_string());
    defines.insert(QUALIFIER_PROPERTY.to_string(), "  rc1 ".to_string());
    let strategy = SystemPropertyStrategy::from_sources(&defines);
    assert_eq!(strategy.qualifier.as_deref(), Some("rc1"));
    assert_eq!(strategy.resolve_version(&module()).unwrap(), "2.0-rc1");
}

#[test]
fn test_sysprop_blank_qualifier_is_ignored() {
    let mut defines = BTreeMap::new();
    defines.insert(VERSION_PROPERTY.to_string(), "2.0".to_string());
    defines.insert(QUALIFIER_PROPERTY.to_string(), "   ".to_string());
    let strategy = SystemPropertyStrategy::from_sources(&defines);
    assert_eq!(strategy.resolve_version(&module()).unwrap(), "2.0");
}
