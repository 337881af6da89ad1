//! The two-pass propagation engine.
//!
//! Pass 1 resolves a new version for every non-excluded module and builds the
//! coordinate map. Pass 2 starts only after pass 1 has finished for every
//! module; it consumes the frozen map and rewrites and persists each
//! non-excluded module's descriptor.
//!
//! Module order is the enumeration order and need not be topological: a
//! dependency on a module that is resolved later is still picked up through
//! the inferred entries of the coordinate map.

use std::path::PathBuf;

use extver_core::config::RunPlan;
use extver_core::coordinate_map::{CoordinateMap, CoordinateMapBuilder};
use extver_core::exclusion::ExclusionSet;
use extver_core::module::Module;
use extver_core::version::VersionChange;
use extver_maven::descriptor::{DeleteOnExit, OutputTarget};
use extver_strategy::VersionStrategy;
use extver_util::errors::{ExtverError, ExtverResult};
use extver_util::progress;

use crate::ops_resolve::resolve_version;
use crate::ops_rewrite::RewriteContext;
use crate::ops_write::{write_descriptor, WriteOptions};

/// Outcome of pass 1.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// One entry per module, index-aligned with the module slice. `None`
    /// marks an excluded module.
    pub changes: Vec<Option<VersionChange>>,
    pub map: CoordinateMap,
}

/// A descriptor persisted in pass 2.
#[derive(Debug, Clone)]
pub struct WrittenDescriptor {
    pub module: String,
    pub change: VersionChange,
    pub path: PathBuf,
}

/// Pass 1: resolve versions and build the coordinate map.
///
/// Each resolved module's version is updated in place. Excluded modules are
/// not touched and contribute no map entries.
pub fn resolve_graph(
    modules: &mut [Module],
    strategy: &dyn VersionStrategy,
    exclusions: &ExclusionSet,
) -> ExtverResult<Resolution> {
    let mut builder = CoordinateMapBuilder::new();
    let mut changes = Vec::with_capacity(modules.len());

    for module in modules.iter_mut() {
        if exclusions.is_excluded(&module.artifact_id) {
            tracing::info!("{module} is excluded");
            progress::status_warn("Skipped", &format!("{module} (excluded)"));
            changes.push(None);
            continue;
        }

        let change = resolve_version(strategy, module)?;
        builder.record_module(module, &change, exclusions);
        tracing::info!("{}:{} {change}", module.group_id, module.artifact_id);
        progress::status(
            "Resolved",
            &format!("{}:{} {change}", module.group_id, module.artifact_id),
        );
        module.version = change.new.clone();
        changes.push(Some(change));
    }

    Ok(Resolution {
        changes,
        map: builder.freeze(),
    })
}

/// Pass 2: rewrite and persist every non-excluded module.
///
/// Stops at the first failure; descriptors written before it stay on disk.
pub fn rewrite_graph(
    modules: &mut [Module],
    resolution: &Resolution,
    plan: &RunPlan,
    cleanup: &mut DeleteOnExit,
) -> ExtverResult<Vec<WrittenDescriptor>> {
    if resolution.changes.len() != modules.len() {
        return Err(ExtverError::Generic {
            message: format!(
                "resolution covers {} module(s) but {} were given",
                resolution.changes.len(),
                modules.len()
            ),
        }
        .into());
    }

    let options = WriteOptions {
        target: OutputTarget::from_flag(plan.generate_temporary_file),
        delete_on_exit: plan.delete_temporary_file,
    };
    let mut written = Vec::new();

    for (module, change) in modules.iter_mut().zip(&resolution.changes) {
        let Some(change) = change else {
            continue;
        };
        let ctx = RewriteContext {
            change,
            map: &resolution.map,
            exclusions: &plan.exclusions,
            properties_to_replace: &plan.properties_to_replace,
        };
        let path = write_descriptor(module, &ctx, options, cleanup)?;
        tracing::info!("wrote {} for {module}", path.display());
        progress::status("Rewrote", &format!("{module} -> {}", path.display()));
        written.push(WrittenDescriptor {
            module: module.to_string(),
            change: change.clone(),
            path,
        });
    }
    Ok(written)
}

/// Run both passes over `modules`.
pub fn propagate(
    modules: &mut [Module],
    strategy: &dyn VersionStrategy,
    plan: &RunPlan,
    cleanup: &mut DeleteOnExit,
) -> ExtverResult<Vec<WrittenDescriptor>> {
    let resolution = resolve_graph(modules, strategy, &plan.exclusions)?;
    tracing::debug!("coordinate map holds {} entries", resolution.map.len());
    rewrite_graph(modules, &resolution, plan, cleanup)
}
