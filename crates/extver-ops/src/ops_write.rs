//! Operation: persist a module's rewritten descriptor.

use std::path::PathBuf;

use extver_core::module::Module;
use extver_maven::descriptor::{DeleteOnExit, Descriptor, OutputTarget};
use extver_util::errors::ExtverResult;

use crate::ops_rewrite::{rewrite_descriptor, rewrite_module, RewriteContext};

/// Where and how rewritten descriptors are persisted.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub target: OutputTarget,
    /// Register every written file with the run's [`DeleteOnExit`] guard.
    pub delete_on_exit: bool,
}

/// Rewrite `module`'s descriptor and persist it.
///
/// The backing descriptor is read, rewritten and serialized to the output
/// path chosen by `options`. Only after the write succeeds is the in-memory
/// module updated and repointed at the new file, so a failure leaves it as it
/// was.
pub fn write_descriptor(
    module: &mut Module,
    ctx: &RewriteContext<'_>,
    options: WriteOptions,
    cleanup: &mut DeleteOnExit,
) -> ExtverResult<PathBuf> {
    let mut updated = module.clone();
    rewrite_module(&mut updated, ctx)?;

    let mut descriptor = Descriptor::load(&module.file)?;
    let edits = rewrite_descriptor(&mut descriptor.document.root, module, ctx)?;

    let output = options.target.allocate(&module.base_dir)?;
    if options.delete_on_exit {
        cleanup.schedule(&output);
    }
    descriptor.write_to(&output)?;
    tracing::debug!(
        "{}: {edits} descriptor edit(s) written to {}",
        updated,
        output.display()
    );

    updated.file = output.clone();
    *module = updated;
    Ok(output)
}
