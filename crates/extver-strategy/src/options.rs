use std::collections::BTreeMap;
use std::str::FromStr;

use extver_util::errors::{ExtverError, ExtverResult};

/// Adapter options as written in configuration, keyed by camelCase name.
///
/// Factories pull the keys they understand with [`StrategyOptions::take`];
/// anything left over is reported by [`StrategyOptions::warn_unused`].
#[derive(Debug, Clone, Default)]
pub struct StrategyOptions {
    hint: String,
    values: BTreeMap<String, String>,
}

impl StrategyOptions {
    pub fn new(hint: impl Into<String>, values: BTreeMap<String, String>) -> Self {
        Self {
            hint: hint.into(),
            values,
        }
    }

    /// Remove and return an option. Blank values count as absent.
    pub fn take(&mut self, key: &str) -> Option<String> {
        self.values
            .remove(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Remove an option and parse it.
    pub fn take_parsed<T>(&mut self, key: &str) -> ExtverResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.take(key) else {
            return Ok(None);
        };
        raw.parse().map(Some).map_err(|e| {
            ExtverError::Configuration {
                message: format!("invalid `{key}` for strategy '{}': {e}", self.hint),
            }
            .into()
        })
    }

    /// Log options no factory consumed.
    pub fn warn_unused(&self) {
        for key in self.values.keys() {
            tracing::warn!("strategy '{}' ignores option `{key}`", self.hint);
        }
    }
}
