use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all extver operations.
#[derive(Debug, Error, Diagnostic)]
pub enum ExtverError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid run configuration (strategy selection, options).
    #[error("Configuration error: {message}")]
    #[diagnostic(help(
        "Configure a <strategy hint=\"...\"> block in the root pom.xml or pass --strategy"
    ))]
    Configuration { message: String },

    /// A version strategy could not produce a version for a module.
    #[error("Strategy '{strategy}' failed for {module}: {message}")]
    StrategyExecution {
        module: String,
        strategy: String,
        message: String,
    },

    /// Reading or writing a module descriptor failed.
    #[error("Descriptor I/O failed for {}: {message}", path.display())]
    DescriptorIo { path: PathBuf, message: String },

    /// A build step configuration does not have the expected shape.
    #[error("Unexpected configuration in {plugin} of {module}: {message}")]
    #[diagnostic(help("Check the plugin's <configuration> block in the module's pom.xml"))]
    StructuralConfig {
        module: String,
        plugin: String,
        message: String,
    },

    /// Malformed XML in a descriptor.
    #[error("XML error: {message}")]
    Xml { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type ExtverResult<T> = miette::Result<T>;
