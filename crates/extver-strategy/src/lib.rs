//! Pluggable sources of a module's new version.
//!
//! Each adapter implements [`VersionStrategy`]. Adapters are selected by a
//! hint string through the static table in [`registry`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use extver_core::module::Module;
use extver_util::errors::{ExtverError, ExtverResult};

pub mod file;
pub mod options;
pub mod registry;
pub mod script;
pub mod sysprop;

pub use options::StrategyOptions;
pub use registry::create_strategy;

/// A source of new versions.
pub trait VersionStrategy {
    /// Hint the strategy is registered under.
    fn hint(&self) -> &'static str;

    /// Produce the raw new version for `module`. The result is trimmed and
    /// checked by the caller.
    fn resolve_version(&self, module: &Module) -> ExtverResult<String>;
}

impl std::fmt::Debug for dyn VersionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionStrategy")
            .field("hint", &self.hint())
            .finish()
    }
}

/// Run-wide inputs available to strategy factories.
#[derive(Debug, Clone, Default)]
pub struct StrategyContext {
    /// Directory holding the root descriptor.
    pub root_dir: PathBuf,
    /// `-D key=value` definitions from the command line.
    pub defines: BTreeMap<String, String>,
}

impl StrategyContext {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            defines: BTreeMap::new(),
        }
    }
}

/// Build a `StrategyExecution` error for `module`.
pub(crate) fn execution_error(
    module: &Module,
    hint: &str,
    message: impl Into<String>,
) -> miette::Report {
    ExtverError::StrategyExecution {
        module: module.to_string(),
        strategy: hint.to_string(),
        message: message.into(),
    }
    .into()
}
