//! Version read from the first line of a file under the module directory.

use std::path::PathBuf;

use extver_core::module::Module;
use extver_util::errors::ExtverResult;
use extver_util::fs::read_first_line;

use crate::{execution_error, StrategyContext, StrategyOptions, VersionStrategy};

pub const HINT: &str = "file";

/// Default version file, relative to the module directory.
pub const DEFAULT_VERSION_FILE: &str = "VERSION";

#[derive(Debug, Clone)]
pub struct FileStrategy {
    pub version_file_path: PathBuf,
}

impl FileStrategy {
    pub fn new(version_file_path: impl Into<PathBuf>) -> Self {
        Self {
            version_file_path: version_file_path.into(),
        }
    }
}

impl VersionStrategy for FileStrategy {
    fn hint(&self) -> &'static str {
        HINT
    }

    fn resolve_version(&self, module: &Module) -> ExtverResult<String> {
        let path = module.base_dir.join(&self.version_file_path);
        tracing::debug!("reading version for {module} from {}", path.display());
        read_first_line(&path)
            .map_err(|e| execution_error(module, HINT, format!("{}: {e}", path.display())))
    }
}

pub(crate) fn build(
    options: &mut StrategyOptions,
    _context: &StrategyContext,
) -> ExtverResult<Box<dyn VersionStrategy>> {
    let path = options
        .take("versionFilePath")
        .unwrap_or_else(|| DEFAULT_VERSION_FILE.to_string());
    Ok(Box::new(FileStrategy::new(path)))
}
