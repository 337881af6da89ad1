use extver_core::config::{RunConfig, StrategySpec, CONFIG_FILE_NAME};
use extver_core::xml::XmlDocument;
use tempfile::TempDir;

const PLUGIN_CONFIGURATION: &str = r#"<configuration>
    <strategy hint="file">
        <versionFilePath>ci/VERSION</versionFilePath>
    </strategy>
    <artifactIdToExclude>core, api</artifactIdToExclude>
    <propertiesToReplace>
        <property>app.version</property>
        <property>docs.version</property>
    </propertiesToReplace>
    <generateTemporaryFile>True</generateTemporaryFile>
</configuration>"#;

fn plugin_config() -> RunConfig {
    let doc = XmlDocument::parse(PLUGIN_CONFIGURATION).unwrap();
    RunConfig::from_plugin_configuration(&doc.root)
}

#[test]
fn test_plugin_configuration_parsing() {
    let config = plugin_config();
    let strategy = config.strategy.as_ref().unwrap();
    assert_eq!(strategy.hint.as_deref(), Some("file"));
    assert_eq!(
        strategy.options.get("versionFilePath").map(String::as_str),
        Some("ci/VERSION")
    );
    assert_eq!(config.artifact_id_to_exclude.as_deref(), Some("core, api"));
    assert_eq!(
        config.properties_to_replace,
        Some(vec!["app.version".to_string(), "docs.version".to_string()])
    );
    assert_eq!(config.generate_temporary_file, Some(true));
    assert_eq!(config.delete_temporary_file, None);
}

#[test]
fn test_plan_from_plugin_configuration() {
    let plan = plugin_config().into_plan().unwrap();
    assert_eq!(plan.strategy.hint, "file");
    assert!(plan.exclusions.is_excluded("core"));
    assert!(plan.exclusions.is_excluded("api"));
    assert!(plan.generate_temporary_file);
    assert!(!plan.delete_temporary_file);
}

#[test]
fn test_toml_config_parsing() {
    let config = RunConfig::from_toml_str(
        r#"
artifact-id-to-exclude = ["core", "api"]
properties-to-replace = ["app.version"]
delete-temporary-file = true

[strategy]
hint = "script"
script = "./ci/version.sh"
timeout-seconds = 30
"#,
    )
    .unwrap();

    let strategy = config.strategy.unwrap();
    assert_eq!(strategy.hint.as_deref(), Some("script"));
    assert_eq!(strategy.options.get("script").map(String::as_str), Some("./ci/version.sh"));
    assert_eq!(strategy.options.get("timeoutSeconds").map(String::as_str), Some("30"));
    assert_eq!(config.artifact_id_to_exclude.as_deref(), Some("core,api"));
    assert_eq!(config.delete_temporary_file, Some(true));
}

#[test]
fn test_toml_rejects_unknown_keys() {
    let err = RunConfig::from_toml_str("generate-temp-file = true").unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

#[test]
fn test_toml_rejects_nested_strategy_option() {
    let err = RunConfig::from_toml_str("[strategy]\nhint = \"file\"\n[strategy.extra]\na = 1\n")
        .unwrap_err();
    assert!(err.to_string().contains("extra"));
}

#[test]
fn test_load_missing_file_is_empty() {
    let tmp = TempDir::new().unwrap();
    let config = RunConfig::load_file(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
    assert_eq!(config, RunConfig::default());
}

#[test]
fn test_load_file_from_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[strategy]\nhint = \"sysprop\"\n").unwrap();
    let plan = RunConfig::load_file(&path).unwrap().into_plan().unwrap();
    assert_eq!(plan.strategy.hint, "sysprop");
    assert!(plan.exclusions.is_empty());
    assert!(plan.properties_to_replace.is_empty());
}

#[test]
fn test_merge_higher_precedence_wins() {
    let base = plugin_config();
    let top = RunConfig {
        artifact_id_to_exclude: Some("web".to_string()),
        generate_temporary_file: Some(false),
        ..RunConfig::default()
    };
    let plan = base.merge(top).into_plan().unwrap();
    assert!(plan.exclusions.is_excluded("web"));
    assert!(!plan.exclusions.is_excluded("core"));
    assert!(!plan.generate_temporary_file);
    assert_eq!(plan.properties_to_replace.len(), 2);
}

#[test]
fn test_merge_strategy_options_for_same_hint() {
    let base = plugin_config();
    let mut options = std::collections::BTreeMap::new();
    options.insert("extra".to_string(), "1".to_string());
    let top = RunConfig {
        strategy: Some(StrategySpec { hint: None, options }),
        ..RunConfig::default()
    };
    let plan = base.merge(top).into_plan().unwrap();
    assert_eq!(plan.strategy.hint, "file");
    assert_eq!(plan.strategy.options.len(), 2);
}

#[test]
fn test_merge_different_hint_replaces_options() {
    let base = plugin_config();
    let top = RunConfig {
        strategy: Some(StrategySpec {
            hint: Some("sysprop".to_string()),
            options: Default::default(),
        }),
        ..RunConfig::default()
    };
    let plan = base.merge(top).into_plan().unwrap();
    assert_eq!(plan.strategy.hint, "sysprop");
    assert!(plan.strategy.options.is_empty());
}

#[test]
fn test_missing_strategy_is_configuration_error() {
    let err = RunConfig::default().into_plan().unwrap_err();
    assert!(err.to_string().contains("no version strategy"));
}

#[test]
fn test_missing_hint_is_configuration_error() {
    let doc = XmlDocument::parse("<configuration><strategy/></configuration>").unwrap();
    let err = RunConfig::from_plugin_configuration(&doc.root)
        .into_plan()
        .unwrap_err();
    assert!(err.to_string().contains("no hint"));
}
