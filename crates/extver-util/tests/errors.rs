use std::path::PathBuf;

use extver_util::errors::ExtverError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = ExtverError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_configuration_error_display() {
    let err = ExtverError::Configuration {
        message: "'strategy' is required".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Configuration error: 'strategy' is required"
    );
}

#[test]
fn test_strategy_error_names_module_and_strategy() {
    let err = ExtverError::StrategyExecution {
        module: "org.example:core:1.0".to_string(),
        strategy: "script".to_string(),
        message: "exit status 3".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Strategy 'script' failed for org.example:core:1.0: exit status 3"
    );
}

#[test]
fn test_descriptor_error_names_path() {
    let err = ExtverError::DescriptorIo {
        path: PathBuf::from("core/pom.xml"),
        message: "permission denied".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Descriptor I/O failed for core/pom.xml: permission denied"
    );
}

#[test]
fn test_structural_error_display() {
    let err = ExtverError::StructuralConfig {
        module: "org.example:app:1.0".to_string(),
        plugin: "maven-install-plugin".to_string(),
        message: "<file> must be a plain value".to_string(),
    };
    assert!(err.to_string().contains("maven-install-plugin"));
    assert!(err.to_string().contains("org.example:app:1.0"));
}

#[test]
fn test_generic_error_display() {
    let err = ExtverError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_error_survives_miette_report() {
    let report: miette::Report = ExtverError::Xml {
        message: "unexpected end".to_string(),
    }
    .into();
    assert!(matches!(
        report.downcast_ref::<ExtverError>(),
        Some(ExtverError::Xml { .. })
    ));
}
