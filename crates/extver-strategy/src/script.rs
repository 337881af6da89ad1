//! Version taken from the first output line of an external program.

use std::path::{Path, PathBuf};
use std::time::Duration;

use extver_core::module::Module;
use extver_util::errors::ExtverResult;
use extver_util::process::CommandBuilder;

use crate::{execution_error, StrategyContext, StrategyOptions, VersionStrategy};

pub const HINT: &str = "script";

pub const DEFAULT_SCRIPT: &str = "./version.sh";

/// Runs `script` in the run root directory. Stdout is preferred; stderr is
/// used when stdout is empty.
#[derive(Debug, Clone)]
pub struct ScriptStrategy {
    pub script: String,
    pub working_dir: PathBuf,
    pub timeout: Option<Duration>,
}

impl ScriptStrategy {
    pub fn new(script: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            script: script.into(),
            working_dir: working_dir.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Relative paths such as `./version.sh` resolve against the working
    /// directory; bare names go through `PATH`.
    fn program(&self) -> String {
        let path = Path::new(&self.script);
        if path.is_relative() && path.components().count() > 1 {
            self.working_dir.join(path).to_string_lossy().into_owned()
        } else {
            self.script.clone()
        }
    }
}

impl VersionStrategy for ScriptStrategy {
    fn hint(&self) -> &'static str {
        HINT
    }

    fn resolve_version(&self, module: &Module) -> ExtverResult<String> {
        let mut command = CommandBuilder::new(self.program())
            .cwd(&self.working_dir)
            .env("EXTVER_MODULE_DIR", module.base_dir.to_string_lossy())
            .env("EXTVER_ARTIFACT_ID", &module.artifact_id);
        if let Some(limit) = self.timeout {
            command = command.timeout(limit);
        }

        tracing::debug!("running `{}` for {module}", self.script);
        let output = command.exec().map_err(|e| {
            execution_error(module, HINT, format!("failed to execute `{}`: {e}", self.script))
        })?;

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            return Err(execution_error(
                module,
                HINT,
                format!("`{}` exited with status {code}", self.script),
            ));
        }
        Ok(output.first_line().to_string())
    }
}

pub(crate) fn build(
    options: &mut StrategyOptions,
    context: &StrategyContext,
) -> ExtverResult<Box<dyn VersionStrategy>> {
    let script = options
        .take("script")
        .unwrap_or_else(|| DEFAULT_SCRIPT.to_string());
    let mut strategy = ScriptStrategy::new(script, &context.root_dir);
    if let Some(seconds) = options.take_parsed::<u64>("timeoutSeconds")? {
        strategy = strategy.with_timeout(Duration::from_secs(seconds));
    }
    Ok(Box::new(strategy))
}
