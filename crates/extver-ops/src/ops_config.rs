//! Operation: assemble the run plan and strategy before any module is touched.

use std::collections::BTreeMap;
use std::path::PathBuf;

use extver_core::config::{RunConfig, RunPlan, CONFIG_FILE_NAME, PLUGIN_ARTIFACT_ID, PLUGIN_GROUP_ID};
use extver_maven::reactor::Reactor;
use extver_strategy::{create_strategy, StrategyContext, VersionStrategy};
use extver_util::errors::ExtverResult;

/// Inputs shared by `apply` and `plan`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Root directory or root POM path.
    pub root: PathBuf,
    /// Settings from the command line; they override every other source.
    pub overrides: RunConfig,
    /// `-D key=value` definitions.
    pub defines: BTreeMap<String, String>,
}

/// A loaded module graph with its immutable plan and instantiated strategy.
pub struct PreparedRun {
    pub reactor: Reactor,
    pub plan: RunPlan,
    pub strategy: Box<dyn VersionStrategy>,
}

/// Merge the configuration sources, lowest precedence first: the root POM's
/// plugin block, `extver.toml` next to it, then command-line overrides.
pub fn load_run_plan(reactor: &Reactor, overrides: RunConfig) -> ExtverResult<RunPlan> {
    let from_pom = reactor
        .root_plugin_configuration(PLUGIN_GROUP_ID, PLUGIN_ARTIFACT_ID)
        .map(RunConfig::from_plugin_configuration)
        .unwrap_or_default();
    let from_file = RunConfig::load_file(&reactor.root_dir.join(CONFIG_FILE_NAME))?;
    from_pom.merge(from_file).merge(overrides).into_plan()
}

/// Enumerate modules, compute the plan and build the strategy.
pub fn prepare(options: &RunOptions) -> ExtverResult<PreparedRun> {
    let reactor = Reactor::load(&options.root)?;
    let plan = load_run_plan(&reactor, options.overrides.clone())?;
    let context = StrategyContext {
        root_dir: reactor.root_dir.clone(),
        defines: options.defines.clone(),
    };
    let strategy = create_strategy(&plan.strategy, &context)?;
    tracing::debug!(
        "run plan: strategy '{}', {} exclusion(s), {} propert(ies) to replace",
        plan.strategy.hint,
        plan.exclusions.len(),
        plan.properties_to_replace.len()
    );
    Ok(PreparedRun {
        reactor,
        plan,
        strategy,
    })
}
