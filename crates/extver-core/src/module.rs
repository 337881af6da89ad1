//! In-memory model of one module of a multi-module build.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::coordinate::CoordinateKey;
use crate::xml::XmlElement;

/// Group id assumed for build plugins that omit `<groupId>`.
pub const DEFAULT_PLUGIN_GROUP: &str = "org.apache.maven.plugins";

/// One project in the module graph.
#[derive(Debug, Clone)]
pub struct Module {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub parent: Option<ParentRef>,
    pub dependencies: Vec<Dependency>,
    pub build_steps: Vec<BuildStep>,
    pub properties: BTreeMap<String, String>,
    /// Build output name (`build > finalName`), when declared.
    pub final_name: Option<String>,
    /// Descriptor currently backing this module. Repointed after a rewrite.
    pub file: PathBuf,
    /// Module root directory; stays fixed when `file` is repointed.
    pub base_dir: PathBuf,
}

/// Reference to a parent descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

/// Which dependency list a declaration comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencySection {
    Dependencies,
    Management,
}

/// A dependency declaration owned by a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    /// Declared version, interpolated. `None` when managed elsewhere.
    pub version: Option<String>,
    pub section: DependencySection,
}

/// Known categories of auxiliary build steps whose configuration embeds versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Install,
    Deploy,
    DependencyCopy,
}

/// A configured build plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildStep {
    pub group_id: String,
    pub artifact_id: String,
    pub configuration: Option<XmlElement>,
    pub executions: Vec<StepExecution>,
}

/// One `<execution>` of a build plugin.
#[derive(Debug, Clone, PartialEq)]
pub struct StepExecution {
    pub id: Option<String>,
    pub configuration: Option<XmlElement>,
}

impl Module {
    /// Create a module backed by `file`; the base directory is the file's parent.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
        file: impl Into<PathBuf>,
    ) -> Self {
        let file = file.into();
        let base_dir = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            parent: None,
            dependencies: Vec::new(),
            build_steps: Vec::new(),
            properties: BTreeMap::new(),
            final_name: None,
            file,
            base_dir,
        }
    }

    /// Coordinate of the module at its current version.
    pub fn coordinate(&self) -> CoordinateKey {
        CoordinateKey::new(&self.group_id, &self.artifact_id, &self.version)
    }

    /// Coordinate of the module at an arbitrary version.
    pub fn coordinate_at(&self, version: &str) -> CoordinateKey {
        CoordinateKey::new(&self.group_id, &self.artifact_id, version)
    }

    /// Resolve `${property}` references using the module's properties and
    /// `project.*` built-ins. Unknown references are left as written.
    pub fn interpolate(&self, input: &str) -> String {
        let mut result = input.to_string();
        let mut iterations = 0;
        while result.contains("${") && iterations < 20 {
            iterations += 1;
            let mut next = result.clone();
            let mut cursor = 0;
            while let Some(offset) = next[cursor..].find("${") {
                let start = cursor + offset;
                let Some(end) = next[start..].find('}') else {
                    break;
                };
                let key = &next[start + 2..start + end];
                match self.resolve_property(key) {
                    Some(value) => {
                        next = format!("{}{}{}", &next[..start], value, &next[start + end + 1..]);
                        cursor = start + value.len();
                    }
                    None => cursor = start + end + 1,
                }
            }
            if next == result {
                break;
            }
            result = next;
        }
        result
    }

    fn resolve_property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => Some(self.group_id.clone()),
            "project.artifactId" | "pom.artifactId" => Some(self.artifact_id.clone()),
            "project.version" | "pom.version" => Some(self.version.clone()),
            "project.parent.groupId" => self.parent.as_ref().map(|p| p.group_id.clone()),
            "project.parent.artifactId" => self.parent.as_ref().map(|p| p.artifact_id.clone()),
            "project.parent.version" => self.parent.as_ref().map(|p| p.version.clone()),
            _ => self.properties.get(key).cloned(),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl ParentRef {
    pub fn coordinate(&self) -> CoordinateKey {
        CoordinateKey::new(&self.group_id, &self.artifact_id, &self.version)
    }
}

impl Dependency {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: Some(version.into()),
            section: DependencySection::Dependencies,
        }
    }

    /// Coordinate of the declaration, if it declares a version.
    pub fn coordinate(&self) -> Option<CoordinateKey> {
        self.version
            .as_ref()
            .map(|v| CoordinateKey::new(&self.group_id, &self.artifact_id, v))
    }
}

impl StepKind {
    /// Category of a plugin, by coordinates.
    pub fn of(group_id: &str, artifact_id: &str) -> Option<Self> {
        if group_id != DEFAULT_PLUGIN_GROUP {
            return None;
        }
        match artifact_id {
            "maven-install-plugin" => Some(Self::Install),
            "maven-deploy-plugin" => Some(Self::Deploy),
            "maven-dependency-plugin" => Some(Self::DependencyCopy),
            _ => None,
        }
    }
}

impl BuildStep {
    pub fn kind(&self) -> Option<StepKind> {
        StepKind::of(&self.group_id, &self.artifact_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module() -> Module {
        let mut m = Module::new("org.example", "app", "1.0", "/work/app/pom.xml");
        m.properties
            .insert("lib.version".to_string(), "3.2".to_string());
        m.properties
            .insert("nested".to_string(), "${lib.version}-x".to_string());
        m.parent = Some(ParentRef {
            group_id: "org.example".to_string(),
            artifact_id: "parent".to_string(),
            version: "0.9".to_string(),
        });
        m
    }

    #[test]
    fn base_dir_is_descriptor_parent() {
        assert_eq!(module().base_dir, PathBuf::from("/work/app"));
    }

    #[test]
    fn interpolates_builtins_and_properties() {
        let m = module();
        assert_eq!(m.interpolate("${project.version}"), "1.0");
        assert_eq!(m.interpolate("${project.parent.version}"), "0.9");
        assert_eq!(m.interpolate("v${lib.version}"), "v3.2");
        assert_eq!(m.interpolate("${nested}"), "3.2-x");
    }

    #[test]
    fn unknown_reference_is_kept() {
        let m = module();
        assert_eq!(m.interpolate("${missing}-${lib.version}"), "${missing}-3.2");
    }

    #[test]
    fn step_kind_requires_default_group() {
        assert_eq!(
            StepKind::of(DEFAULT_PLUGIN_GROUP, "maven-deploy-plugin"),
            Some(StepKind::Deploy)
        );
        assert_eq!(StepKind::of("com.acme", "maven-deploy-plugin"), None);
        assert_eq!(StepKind::of(DEFAULT_PLUGIN_GROUP, "maven-jar-plugin"), None);
    }

    #[test]
    fn dependency_without_version_has_no_coordinate() {
        let mut dep = Dependency::new("g", "a", "1");
        assert!(dep.coordinate().is_some());
        dep.version = None;
        assert!(dep.coordinate().is_none());
    }
}
