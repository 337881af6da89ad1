//! Operation: show what a run would change without writing anything.

use serde::Serialize;

use extver_util::errors::ExtverResult;

use crate::ops_config::{prepare, RunOptions};
use crate::ops_propagate::resolve_graph;

/// Pass 1 outcome for display.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub strategy: String,
    pub modules: Vec<PlannedModule>,
    pub coordinate_map: Vec<MapEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedModule {
    pub group_id: String,
    pub artifact_id: String,
    pub old_version: String,
    /// `None` for excluded modules.
    pub new_version: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapEntry {
    pub from: String,
    pub to: String,
}

/// Resolve versions and build the coordinate map only.
pub fn plan(options: &RunOptions) -> ExtverResult<PlanReport> {
    let mut run = prepare(options)?;
    let originals: Vec<String> = run
        .reactor
        .modules
        .iter()
        .map(|m| m.version.clone())
        .collect();
    let resolution = resolve_graph(
        &mut run.reactor.modules,
        run.strategy.as_ref(),
        &run.plan.exclusions,
    )?;

    let modules = run
        .reactor
        .modules
        .iter()
        .zip(originals)
        .zip(&resolution.changes)
        .map(|((module, old_version), change)| PlannedModule {
            group_id: module.group_id.clone(),
            artifact_id: module.artifact_id.clone(),
            old_version,
            new_version: change.as_ref().map(|c| c.new.clone()),
        })
        .collect();

    let coordinate_map = resolution
        .map
        .iter()
        .map(|(from, to)| MapEntry {
            from: from.to_string(),
            to: to.to_string(),
        })
        .collect();

    Ok(PlanReport {
        strategy: run.plan.strategy.hint,
        modules,
        coordinate_map,
    })
}
