//! Command dispatch and handler modules.

mod apply;
mod plan;

use std::collections::BTreeMap;

use miette::Result;

use extver_core::config::{kebab_to_camel, RunConfig, StrategySpec};
use extver_ops::ops_config::RunOptions;

use crate::cli::{Cli, Command, RunArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Apply { run } => {
            let options = run_options(run);
            tracing::debug!("apply: {options:?}");
            apply::exec(options)
        }
        Command::Plan { run, json } => {
            let options = run_options(run);
            tracing::debug!("plan: {options:?}");
            plan::exec(options, json)
        }
    }
}

/// Turn command-line flags into the highest-precedence configuration layer.
/// Flags that were not given stay unset so lower layers show through.
fn run_options(args: RunArgs) -> RunOptions {
    let strategy = if args.strategy.is_some() || !args.options.is_empty() {
        Some(StrategySpec {
            hint: args.strategy,
            options: args
                .options
                .into_iter()
                .map(|(k, v)| (kebab_to_camel(&k), v))
                .collect(),
        })
    } else {
        None
    };

    let overrides = RunConfig {
        strategy,
        artifact_id_to_exclude: (!args.exclude.is_empty()).then(|| args.exclude.join(",")),
        properties_to_replace: (!args.properties.is_empty()).then_some(args.properties),
        generate_temporary_file: args.generate_temporary_file.then_some(true),
        delete_temporary_file: args.delete_temporary_file.then_some(true),
    };

    RunOptions {
        root: args.root,
        overrides,
        defines: args.defines.into_iter().collect::<BTreeMap<_, _>>(),
    }
}
