//! Operation: rewrite every module of a build to externally supplied versions.

use extver_maven::descriptor::DeleteOnExit;
use extver_util::errors::ExtverResult;

use crate::ops_config::{prepare, RunOptions};
use crate::ops_propagate::{propagate, WrittenDescriptor};

/// Run both passes and persist rewritten descriptors.
///
/// Files scheduled for deletion are registered with `cleanup`; the caller
/// keeps the guard alive until the process is about to exit.
pub fn apply(options: &RunOptions, cleanup: &mut DeleteOnExit) -> ExtverResult<Vec<WrittenDescriptor>> {
    let mut run = prepare(options)?;
    propagate(
        &mut run.reactor.modules,
        run.strategy.as_ref(),
        &run.plan,
        cleanup,
    )
}
