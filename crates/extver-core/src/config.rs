use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use extver_util::errors::{ExtverError, ExtverResult};

use crate::exclusion::ExclusionSet;
use crate::xml::XmlElement;

/// Group id of the build plugin whose `<configuration>` seeds a run.
pub const PLUGIN_GROUP_ID: &str = "org.apache.maven.plugins";

/// Artifact id of the build plugin whose `<configuration>` seeds a run.
pub const PLUGIN_ARTIFACT_ID: &str = "maven-external-version-plugin";

/// Optional per-project configuration file, next to the root descriptor.
pub const CONFIG_FILE_NAME: &str = "extver.toml";

/// Strategy selection as written in one configuration source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrategySpec {
    pub hint: Option<String>,
    /// Adapter options keyed by their camelCase name (`versionFilePath`).
    pub options: BTreeMap<String, String>,
}

/// Run configuration from a single source. Unset fields defer to lower
/// precedence sources in [`RunConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunConfig {
    pub strategy: Option<StrategySpec>,
    pub artifact_id_to_exclude: Option<String>,
    pub properties_to_replace: Option<Vec<String>>,
    pub generate_temporary_file: Option<bool>,
    pub delete_temporary_file: Option<bool>,
}

/// A selected strategy with its options, after merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySelection {
    pub hint: String,
    pub options: BTreeMap<String, String>,
}

/// Immutable settings for one propagation run, computed before the first
/// module is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub strategy: StrategySelection,
    pub exclusions: ExclusionSet,
    pub properties_to_replace: Vec<String>,
    pub generate_temporary_file: bool,
    pub delete_temporary_file: bool,
}

/// `extver.toml` as written on disk.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    artifact_id_to_exclude: Option<ExcludeList>,
    #[serde(default)]
    properties_to_replace: Option<Vec<String>>,
    #[serde(default)]
    generate_temporary_file: Option<bool>,
    #[serde(default)]
    delete_temporary_file: Option<bool>,
    #[serde(default)]
    strategy: Option<toml::Table>,
}

/// Exclusions may be a comma-separated string or an array of ids.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExcludeList {
    Csv(String),
    List(Vec<String>),
}

impl RunConfig {
    /// Read the plugin `<configuration>` element of a root descriptor.
    pub fn from_plugin_configuration(configuration: &XmlElement) -> Self {
        let strategy = configuration.child("strategy").map(|element| StrategySpec {
            hint: element
                .attribute("hint")
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string),
            options: element
                .elements()
                .map(|option| (option.name.clone(), option.trimmed_text()))
                .collect(),
        });

        let properties_to_replace = configuration.child("propertiesToReplace").map(|list| {
            list.elements()
                .map(XmlElement::trimmed_text)
                .filter(|name| !name.is_empty())
                .collect()
        });

        Self {
            strategy,
            artifact_id_to_exclude: configuration.child_text("artifactIdToExclude"),
            properties_to_replace,
            generate_temporary_file: configuration
                .child_text("generateTemporaryFile")
                .map(|v| parse_flag(&v)),
            delete_temporary_file: configuration
                .child_text("deleteTemporaryFile")
                .map(|v| parse_flag(&v)),
        }
    }

    /// Parse the contents of an `extver.toml` file.
    pub fn from_toml_str(content: &str) -> ExtverResult<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ExtverError::Configuration {
            message: format!("Failed to parse {CONFIG_FILE_NAME}: {e}"),
        })?;

        let strategy = file.strategy.map(strategy_from_table).transpose()?;

        Ok(Self {
            strategy,
            artifact_id_to_exclude: file.artifact_id_to_exclude.map(|list| match list {
                ExcludeList::Csv(csv) => csv,
                ExcludeList::List(ids) => ids.join(","),
            }),
            properties_to_replace: file.properties_to_replace,
            generate_temporary_file: file.generate_temporary_file,
            delete_temporary_file: file.delete_temporary_file,
        })
    }

    /// Load `extver.toml` from `path`. A missing file yields an empty config.
    pub fn load_file(path: &Path) -> ExtverResult<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ExtverError::Configuration {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        tracing::debug!("loaded run configuration from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Overlay `other` on top of `self`; set fields in `other` win.
    ///
    /// Strategy options are merged key by key while both sources name the
    /// same hint. A different hint replaces the lower source's options.
    pub fn merge(self, other: RunConfig) -> RunConfig {
        let strategy = match (self.strategy, other.strategy) {
            (Some(base), Some(top)) => {
                let same_hint = top.hint.is_none() || top.hint == base.hint;
                if same_hint {
                    let mut options = base.options;
                    options.extend(top.options);
                    Some(StrategySpec {
                        hint: top.hint.or(base.hint),
                        options,
                    })
                } else {
                    Some(top)
                }
            }
            (base, top) => top.or(base),
        };

        RunConfig {
            strategy,
            artifact_id_to_exclude: other.artifact_id_to_exclude.or(self.artifact_id_to_exclude),
            properties_to_replace: other.properties_to_replace.or(self.properties_to_replace),
            generate_temporary_file: other.generate_temporary_file.or(self.generate_temporary_file),
            delete_temporary_file: other.delete_temporary_file.or(self.delete_temporary_file),
        }
    }

    /// Validate and freeze the merged configuration.
    pub fn into_plan(self) -> ExtverResult<RunPlan> {
        let Some(strategy) = self.strategy else {
            return Err(ExtverError::Configuration {
                message: "no version strategy configured".to_string(),
            }
            .into());
        };
        let Some(hint) = strategy.hint else {
            return Err(ExtverError::Configuration {
                message: "the strategy block has no hint".to_string(),
            }
            .into());
        };

        Ok(RunPlan {
            strategy: StrategySelection {
                hint,
                options: strategy.options,
            },
            exclusions: self
                .artifact_id_to_exclude
                .as_deref()
                .map(ExclusionSet::from_csv)
                .unwrap_or_default(),
            properties_to_replace: self.properties_to_replace.unwrap_or_default(),
            generate_temporary_file: self.generate_temporary_file.unwrap_or(false),
            delete_temporary_file: self.delete_temporary_file.unwrap_or(false),
        })
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn strategy_from_table(table: toml::Table) -> ExtverResult<StrategySpec> {
    let mut spec = StrategySpec::default();
    for (key, value) in table {
        let text = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            other => {
                return Err(ExtverError::Configuration {
                    message: format!(
                        "strategy option `{key}` must be a scalar, found {}",
                        other.type_str()
                    ),
                }
                .into())
            }
        };
        if key == "hint" {
            spec.hint = Some(text);
        } else {
            spec.options.insert(kebab_to_camel(&key), text);
        }
    }
    Ok(spec)
}

/// `version-file-path` -> `versionFilePath`. Names without dashes pass through.
pub fn kebab_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' || c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
