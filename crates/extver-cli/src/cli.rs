//! CLI argument definitions for extver.
//!
//! Uses `clap` derive macros. Each command corresponds to a handler in the
//! [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "extver",
    version,
    about = "Rewrite Maven module versions from an external version source",
    long_about = "extver resolves a new version for every module of a multi-module Maven build \
                  from a file, a script or a property, and propagates it through parent \
                  references, dependencies, properties and plugin configuration."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve new versions and write rewritten descriptors
    Apply {
        #[command(flatten)]
        run: RunArgs,
    },

    /// Show the versions a run would produce without writing anything
    Plan {
        #[command(flatten)]
        run: RunArgs,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options shared by `apply` and `plan`. They override `extver.toml` and the
/// root POM's plugin configuration.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Root directory or root pom.xml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Version strategy: file, script, sysprop
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Strategy option, e.g. `version-file-path=ci/VERSION`
    #[arg(long = "option", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,

    /// Artifact ids to leave untouched (repeatable or comma-separated)
    #[arg(long = "exclude", value_name = "ARTIFACT_ID", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Property to overwrite with the new version (repeatable)
    #[arg(long = "property", value_name = "NAME")]
    pub properties: Vec<String>,

    /// Write rewritten descriptors to temporary files
    #[arg(long)]
    pub generate_temporary_file: bool,

    /// Delete written descriptors when the process exits
    #[arg(long)]
    pub delete_temporary_file: bool,

    /// Define a property, e.g. `-D external.version=2.0`
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub defines: Vec<(String, String)>,
}

/// Parse `key=value`. The value may be empty; the key may not.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

/// Parse CLI arguments.
pub fn parse() -> Cli {
    Cli::parse()
}
