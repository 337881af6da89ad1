use miette::Result;

use extver_ops::ops_config::RunOptions;
use extver_ops::ops_plan;
use extver_util::errors::ExtverError;

pub fn exec(options: RunOptions, json: bool) -> Result<()> {
    let report = ops_plan::plan(&options)?;

    if json {
        let out = serde_json::to_string_pretty(&report).map_err(|e| ExtverError::Generic {
            message: format!("Failed to serialize plan: {e}"),
        })?;
        println!("{out}");
        return Ok(());
    }

    println!("Strategy: {}", report.strategy);
    for module in &report.modules {
        match &module.new_version {
            Some(new) => println!(
                "{}:{} {} -> {new}",
                module.group_id, module.artifact_id, module.old_version
            ),
            None => println!(
                "{}:{} {} (excluded)",
                module.group_id, module.artifact_id, module.old_version
            ),
        }
    }
    if !report.coordinate_map.is_empty() {
        println!();
        println!("Coordinate map:");
        for entry in &report.coordinate_map {
            println!("  {} -> {}", entry.from, entry.to);
        }
    }
    Ok(())
}
