use std::collections::BTreeMap;

use extver_core::config::StrategySelection;
use extver_core::module::Module;
use extver_strategy::file::FileStrategy;
use extver_strategy::{create_strategy, StrategyContext, VersionStrategy};
use tempfile::TempDir;

fn module_in(tmp: &TempDir) -> Module {
    Module::new("org.example", "core", "1.0-SNAPSHOT", tmp.path().join("pom.xml"))
}

#[test]
fn test_file_strategy_reads_first_line() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("VERSION"), "2.1.0\r\nignored\n").unwrap();
    let strategy = FileStrategy::new("VERSION");
    assert_eq!(strategy.resolve_version(&module_in(&tmp)).unwrap(), "2.1.0");
}

#[test]
fn test_file_strategy_path_is_relative_to_module_dir() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("ci")).unwrap();
    std::fs::write(tmp.path().join("ci/version.txt"), "3.0").unwrap();

    let mut options = BTreeMap::new();
    options.insert("versionFilePath".to_string(), "ci/version.txt".to_string());
    let selection = StrategySelection {
        hint: "file".to_string(),
        options,
    };
    let strategy = create_strategy(&selection, &StrategyContext::new("/unused")).unwrap();
    assert_eq!(strategy.hint(), "file");
    assert_eq!(strategy.resolve_version(&module_in(&tmp)).unwrap(), "3.0");
}

#[test]
fn test_file_strategy_missing_file_is_execution_error() {
    let tmp = TempDir::new().unwrap();
    let err = FileStrategy::new("VERSION")
        .resolve_version(&module_in(&tmp))
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Strategy 'file' failed for org.example:core:1.0-SNAPSHOT"));
}

#[test]
fn test_file_strategy_keeps_surrounding_spaces() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("VERSION"), "  2.0  \n").unwrap();
    let version = FileStrategy::new("VERSION")
        .resolve_version(&module_in(&tmp))
        .unwrap();
    assert_eq!(version, "  2.0  ");
}
