use miette::Result;

use extver_maven::descriptor::DeleteOnExit;
use extver_ops::ops_apply;
use extver_ops::ops_config::RunOptions;
use extver_util::progress;

pub fn exec(options: RunOptions) -> Result<()> {
    // Scheduled deletions run when this guard drops, on success or error.
    let mut cleanup = DeleteOnExit::new();
    let written = ops_apply::apply(&options, &mut cleanup)?;

    for descriptor in &written {
        println!("{}", descriptor.path.display());
    }
    progress::status_info(
        "Finished",
        &format!("{} descriptor(s) rewritten", written.len()),
    );
    Ok(())
}
