//! Module graph enumeration starting from a root POM.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use extver_core::module::Module;
use extver_core::xml::XmlElement;
use extver_util::errors::{ExtverError, ExtverResult};

use crate::descriptor::Descriptor;
use crate::pom::Pom;

/// Descriptor file name looked up in module directories.
pub const POM_FILE_NAME: &str = "pom.xml";

const MAX_PARENT_DEPTH: usize = 32;

/// All modules reachable from a root POM, in enumeration order.
#[derive(Debug)]
pub struct Reactor {
    /// Directory holding the root descriptor.
    pub root_dir: PathBuf,
    pub root_file: PathBuf,
    /// Root descriptor as written, used for run configuration lookup.
    pub root_pom: Pom,
    /// Depth-first, declaration order, each descriptor file once.
    pub modules: Vec<Module>,
}

impl Reactor {
    /// Enumerate the module graph. `root` is either a directory containing
    /// `pom.xml` or the path of a POM file.
    pub fn load(root: &Path) -> ExtverResult<Self> {
        let root_file = if root.is_dir() {
            root.join(POM_FILE_NAME)
        } else {
            root.to_path_buf()
        };
        if !root_file.is_file() {
            return Err(ExtverError::DescriptorIo {
                path: root_file,
                message: "no such descriptor".to_string(),
            }
            .into());
        }
        let root_dir = root_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut walker = Walker::default();
        walker.visit(&root_file)?;
        let root_pom = walker.read_pom(&root_file)?;

        tracing::debug!(
            "enumerated {} module(s) from {}",
            walker.modules.len(),
            root_file.display()
        );
        Ok(Self {
            root_dir,
            root_file,
            root_pom,
            modules: walker.modules,
        })
    }

    /// Configuration block of a plugin declared in the root POM.
    pub fn root_plugin_configuration(
        &self,
        group_id: &str,
        artifact_id: &str,
    ) -> Option<&XmlElement> {
        self.root_pom.plugin_configuration(group_id, artifact_id)
    }
}

#[derive(Default)]
struct Walker {
    seen: HashSet<PathBuf>,
    modules: Vec<Module>,
    raw: HashMap<PathBuf, Pom>,
    effective: HashMap<PathBuf, Pom>,
}

impl Walker {
    fn visit(&mut self, file: &Path) -> ExtverResult<()> {
        let key = canonical(file);
        if !self.seen.insert(key) {
            tracing::debug!("{} already enumerated", file.display());
            return Ok(());
        }

        let pom = self.effective_pom(file, 0)?;
        let module_entries = pom.modules.clone();
        let module = pom.into_module(file.to_path_buf())?;
        let base_dir = module.base_dir.clone();
        tracing::debug!("module {module} at {}", file.display());
        self.modules.push(module);

        for entry in module_entries {
            let child = module_file(&base_dir, &entry);
            if !child.is_file() {
                return Err(ExtverError::DescriptorIo {
                    path: child,
                    message: format!("module `{entry}` has no descriptor"),
                }
                .into());
            }
            self.visit(&child)?;
        }
        Ok(())
    }

    fn read_pom(&mut self, file: &Path) -> ExtverResult<Pom> {
        let key = canonical(file);
        if let Some(pom) = self.raw.get(&key) {
            return Ok(pom.clone());
        }
        let descriptor = Descriptor::load(file)?;
        let pom = Pom::from_document(&descriptor.document)?;
        self.raw.insert(key, pom.clone());
        Ok(pom)
    }

    /// POM with properties inherited from local parents reachable through
    /// `<relativePath>` (default `../pom.xml`).
    fn effective_pom(&mut self, file: &Path, depth: usize) -> ExtverResult<Pom> {
        let key = canonical(file);
        if let Some(pom) = self.effective.get(&key) {
            return Ok(pom.clone());
        }
        let mut pom = self.read_pom(file)?;

        if depth < MAX_PARENT_DEPTH {
            if let Some(parent_file) = self.local_parent(file, &pom)? {
                let parent = self.effective_pom(&parent_file, depth + 1)?;
                pom.apply_parent(&parent);
            }
        }

        self.effective.insert(key, pom.clone());
        Ok(pom)
    }

    fn local_parent(&mut self, file: &Path, pom: &Pom) -> ExtverResult<Option<PathBuf>> {
        let Some(parent) = &pom.parent else {
            return Ok(None);
        };
        let base = file.parent().unwrap_or_else(|| Path::new("."));
        let relative = parent.relative_path.as_deref().unwrap_or("../pom.xml");
        if relative.is_empty() {
            return Ok(None);
        }
        let candidate = module_file(base, relative);
        if !candidate.is_file() || canonical(&candidate) == canonical(file) {
            return Ok(None);
        }
        let candidate_pom = self.read_pom(&candidate)?;
        if candidate_pom.artifact_id.as_deref() == Some(parent.artifact_id.as_str()) {
            Ok(Some(candidate))
        } else {
            Ok(None)
        }
    }
}

/// `<module>` entries name a directory holding `pom.xml` or a POM file.
fn module_file(base_dir: &Path, entry: &str) -> PathBuf {
    let path = base_dir.join(entry);
    if path.is_dir() {
        path.join(POM_FILE_NAME)
    } else {
        path
    }
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
