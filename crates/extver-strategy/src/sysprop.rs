//! Version override supplied as a property on the command line or in the
//! environment.

use std::collections::BTreeMap;

use extver_core::module::Module;
use extver_core::version::strip_pre_release_once;
use extver_util::errors::ExtverResult;

use crate::{StrategyContext, StrategyOptions, VersionStrategy};

pub const HINT: &str = "sysprop";

pub const VERSION_PROPERTY: &str = "external.version";
pub const QUALIFIER_PROPERTY: &str = "external.version-qualifier";

pub const VERSION_ENV: &str = "EXTERNAL_VERSION";
pub const QUALIFIER_ENV: &str = "EXTERNAL_VERSION_QUALIFIER";

/// Uses `external.version` when set, else the module's current version.
/// A non-blank `external.version-qualifier` replaces the first `-SNAPSHOT`
/// with `-<qualifier>`.
#[derive(Debug, Clone, Default)]
pub struct SystemPropertyStrategy {
    pub version: Option<String>,
    pub qualifier: Option<String>,
}

impl SystemPropertyStrategy {
    /// Read both properties from `defines`, falling back to the environment.
    pub fn from_sources(defines: &BTreeMap<String, String>) -> Self {
        let lookup = |property: &str, env: &str| {
            defines
                .get(property)
                .cloned()
                .or_else(|| std::env::var(env).ok())
        };
        Self {
            version: lookup(VERSION_PROPERTY, VERSION_ENV),
            qualifier: lookup(QUALIFIER_PROPERTY, QUALIFIER_ENV)
                .map(|q| q.trim().to_string())
                .filter(|q| !q.is_empty()),
        }
    }
}

impl VersionStrategy for SystemPropertyStrategy {
    fn hint(&self) -> &'static str {
        HINT
    }

    fn resolve_version(&self, module: &Module) -> ExtverResult<String> {
        let base = self
            .version
            .clone()
            .unwrap_or_else(|| module.version.clone());
        Ok(match &self.qualifier {
            Some(qualifier) => format!("{}-{qualifier}", strip_pre_release_once(&base)),
            None => base,
        })
    }
}

pub(crate) fn build(
    _options: &mut StrategyOptions,
    context: &StrategyContext,
) -> ExtverResult<Box<dyn VersionStrategy>> {
    Ok(Box::new(SystemPropertyStrategy::from_sources(
        &context.defines,
    )))
}
