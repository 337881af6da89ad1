//! Loading and persisting descriptor trees, and choosing where rewritten
//! descriptors go.

use std::path::{Path, PathBuf};

use extver_core::xml::XmlDocument;
use extver_util::errors::{ExtverError, ExtverResult};

/// Name of the rewritten descriptor written next to the original.
pub const NEW_VERSION_FILE_NAME: &str = "pom.xml.new-version";

/// Prefix of generated temporary descriptor files.
pub const TEMP_FILE_PREFIX: &str = "pom";

/// Suffix of generated temporary descriptor files.
pub const TEMP_FILE_SUFFIX: &str = ".maven-external-version";

/// A descriptor file loaded into an editable tree.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub path: PathBuf,
    pub document: XmlDocument,
}

impl Descriptor {
    /// Read and parse `path`. Failures carry the file path.
    pub fn load(path: &Path) -> ExtverResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ExtverError::DescriptorIo {
            path: path.to_path_buf(),
            message: format!("read failed: {e}"),
        })?;
        let document = XmlDocument::parse(&content).map_err(|e| ExtverError::DescriptorIo {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    /// Serialize the tree to `target`.
    pub fn write_to(&self, target: &Path) -> ExtverResult<()> {
        let xml = self
            .document
            .to_xml_string()
            .map_err(|e| ExtverError::DescriptorIo {
                path: target.to_path_buf(),
                message: e.to_string(),
            })?;
        std::fs::write(target, xml).map_err(|e| ExtverError::DescriptorIo {
            path: target.to_path_buf(),
            message: format!("write failed: {e}"),
        })?;
        Ok(())
    }
}

/// Where the rewritten descriptor of a module is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// `<module dir>/pom.xml.new-version`.
    #[default]
    Sibling,
    /// A fresh file in the system temporary directory.
    Temporary,
}

impl OutputTarget {
    pub fn from_flag(generate_temporary_file: bool) -> Self {
        if generate_temporary_file {
            Self::Temporary
        } else {
            Self::Sibling
        }
    }

    /// Allocate the output path for a module rooted at `base_dir`.
    ///
    /// Temporary files are created empty and kept on disk; deletion is the
    /// caller's business (see [`DeleteOnExit`]).
    pub fn allocate(self, base_dir: &Path) -> ExtverResult<PathBuf> {
        match self {
            Self::Sibling => Ok(base_dir.join(NEW_VERSION_FILE_NAME)),
            Self::Temporary => {
                let file = tempfile::Builder::new()
                    .prefix(TEMP_FILE_PREFIX)
                    .suffix(TEMP_FILE_SUFFIX)
                    .tempfile()
                    .map_err(|e| ExtverError::DescriptorIo {
                        path: std::env::temp_dir(),
                        message: format!("cannot create temporary descriptor: {e}"),
                    })?;
                let (_, path) = file.keep().map_err(|e| ExtverError::DescriptorIo {
                    path: std::env::temp_dir(),
                    message: format!("cannot keep temporary descriptor: {e}"),
                })?;
                Ok(path)
            }
        }
    }
}

/// Files removed, best effort, when the guard is dropped.
///
/// Hold it for the lifetime of the run so removal happens on every exit path.
#[derive(Debug, Default)]
pub struct DeleteOnExit {
    paths: Vec<PathBuf>,
}

impl DeleteOnExit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Drop for DeleteOnExit {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => tracing::debug!("deleted {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("could not delete {}: {e}", path.display()),
            }
        }
    }
}
