//! POM descriptor model: coordinates, parent reference, properties, dependencies,
//! build plugins and child modules.

use std::collections::BTreeMap;
use std::path::PathBuf;

use extver_core::module::{
    BuildStep, Dependency, DependencySection, Module, ParentRef, StepExecution,
    DEFAULT_PLUGIN_GROUP,
};
use extver_core::xml::{XmlDocument, XmlElement};
use extver_util::errors::{ExtverError, ExtverResult};

/// A parsed POM file, as written (no inheritance applied).
#[derive(Debug, Clone, Default)]
pub struct Pom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,

    pub parent: Option<PomParent>,
    pub properties: BTreeMap<String, String>,
    pub dependencies: Vec<PomDependency>,
    pub dependency_management: Vec<PomDependency>,
    pub modules: Vec<String>,
    pub plugins: Vec<PomPlugin>,
    pub plugin_management: Vec<PomPlugin>,
    pub final_name: Option<String>,
}

/// `<parent>` block of a POM.
#[derive(Debug, Clone)]
pub struct PomParent {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub relative_path: Option<String>,
}

/// A dependency declared in a POM file.
#[derive(Debug, Clone)]
pub struct PomDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
}

/// A `<plugin>` entry under `build > plugins` or `build > pluginManagement`.
#[derive(Debug, Clone)]
pub struct PomPlugin {
    /// `None` when omitted; Maven then assumes `org.apache.maven.plugins`.
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub configuration: Option<XmlElement>,
    pub executions: Vec<StepExecution>,
}

impl Pom {
    /// Read the model out of a parsed document.
    pub fn from_document(doc: &XmlDocument) -> ExtverResult<Self> {
        let project = &doc.root;
        if project.name != "project" {
            return Err(ExtverError::Xml {
                message: format!("expected <project> root element, found <{}>", project.name),
            }
            .into());
        }

        let parent = project.child("parent").map(|p| PomParent {
            group_id: p.child_text("groupId").unwrap_or_default(),
            artifact_id: p.child_text("artifactId").unwrap_or_default(),
            version: p.child_text("version").unwrap_or_default(),
            relative_path: p.child_text("relativePath"),
        });

        let properties = project
            .child("properties")
            .map(|props| {
                props
                    .elements()
                    .map(|p| (p.name.clone(), p.trimmed_text()))
                    .collect()
            })
            .unwrap_or_default();

        let modules = project
            .child("modules")
            .map(|m| {
                m.children_named("module")
                    .map(XmlElement::trimmed_text)
                    .filter(|m| !m.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let build = project.child("build");
        Ok(Self {
            group_id: project.child_text("groupId"),
            artifact_id: project.child_text("artifactId"),
            version: project.child_text("version"),
            packaging: project.child_text("packaging"),
            parent,
            properties,
            dependencies: read_dependencies(project.find_path(&["dependencies"])),
            dependency_management: read_dependencies(
                project.find_path(&["dependencyManagement", "dependencies"]),
            ),
            modules,
            plugins: read_plugins(build.and_then(|b| b.child("plugins"))),
            plugin_management: read_plugins(
                build.and_then(|b| b.find_path(&["pluginManagement", "plugins"])),
            ),
            final_name: build.and_then(|b| b.child_text("finalName")),
        })
    }

    /// Effective group ID (falls back to parent).
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.group_id.as_str()))
            .filter(|g| !g.is_empty())
    }

    /// Effective version (falls back to parent).
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or(self.parent.as_ref().map(|p| p.version.as_str()))
            .filter(|v| !v.is_empty())
    }

    /// Inherit properties from an already-effective parent POM. Values declared
    /// here win over the parent's.
    pub fn apply_parent(&mut self, parent: &Pom) {
        for (k, v) in &parent.properties {
            self.properties
                .entry(k.clone())
                .or_insert_with(|| v.clone());
        }
    }

    /// Configuration of a plugin declared in `build > plugins`, falling back to
    /// `build > pluginManagement > plugins`.
    pub fn plugin_configuration(&self, group_id: &str, artifact_id: &str) -> Option<&XmlElement> {
        let matches = |p: &&PomPlugin| {
            p.artifact_id == artifact_id
                && p.group_id.as_deref().unwrap_or(DEFAULT_PLUGIN_GROUP) == group_id
        };
        self.plugins
            .iter()
            .find(matches)
            .or_else(|| self.plugin_management.iter().find(matches))
            .and_then(|p| p.configuration.as_ref())
    }

    /// Build the engine's view of this POM, with coordinates interpolated.
    ///
    /// Fails when the artifact id is missing, or when neither the POM nor its
    /// parent reference supply a group id and version.
    pub fn into_module(self, file: PathBuf) -> ExtverResult<Module> {
        let missing = |what: &str| ExtverError::DescriptorIo {
            path: file.clone(),
            message: format!("missing <{what}>"),
        };
        let artifact_id = self
            .artifact_id
            .clone()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| missing("artifactId"))?;
        let group_id = self
            .effective_group_id()
            .map(str::to_string)
            .ok_or_else(|| missing("groupId"))?;
        let version = self
            .effective_version()
            .map(str::to_string)
            .ok_or_else(|| missing("version"))?;

        let mut module = Module::new(group_id, artifact_id, version, file);
        module.properties = self.properties;
        module.final_name = self.final_name;
        module.parent = self.parent.map(|p| ParentRef {
            group_id: p.group_id,
            artifact_id: p.artifact_id,
            version: p.version,
        });

        module.group_id = module.interpolate(&module.group_id);
        module.version = module.interpolate(&module.version);
        if let Some(parent) = module.parent.clone() {
            module.parent = Some(ParentRef {
                group_id: module.interpolate(&parent.group_id),
                artifact_id: module.interpolate(&parent.artifact_id),
                version: module.interpolate(&parent.version),
            });
        }

        let declared = self
            .dependencies
            .into_iter()
            .map(|d| (d, DependencySection::Dependencies))
            .chain(
                self.dependency_management
                    .into_iter()
                    .map(|d| (d, DependencySection::Management)),
            );
        let dependencies: Vec<Dependency> = declared
            .map(|(d, section)| Dependency {
                group_id: module.interpolate(&d.group_id),
                artifact_id: module.interpolate(&d.artifact_id),
                version: d.version.as_deref().map(|v| module.interpolate(v)),
                section,
            })
            .collect();
        module.dependencies = dependencies;

        module.build_steps = self
            .plugins
            .into_iter()
            .map(|p| BuildStep {
                group_id: p
                    .group_id
                    .unwrap_or_else(|| DEFAULT_PLUGIN_GROUP.to_string()),
                artifact_id: p.artifact_id,
                configuration: p.configuration,
                executions: p.executions,
            })
            .collect();

        Ok(module)
    }
}

/// Parse a POM XML string into a `Pom` struct.
pub fn parse_pom(xml: &str) -> ExtverResult<Pom> {
    let doc = XmlDocument::parse(xml)?;
    Pom::from_document(&doc)
}

fn read_dependencies(list: Option<&XmlElement>) -> Vec<PomDependency> {
    let Some(list) = list else {
        return Vec::new();
    };
    list.children_named("dependency")
        .map(|d| PomDependency {
            group_id: d.child_text("groupId").unwrap_or_default(),
            artifact_id: d.child_text("artifactId").unwrap_or_default(),
            version: d.child_text("version").filter(|v| !v.is_empty()),
        })
        .collect()
}

fn read_plugins(list: Option<&XmlElement>) -> Vec<PomPlugin> {
    let Some(list) = list else {
        return Vec::new();
    };
    list.children_named("plugin")
        .map(|p| PomPlugin {
            group_id: p.child_text("groupId"),
            artifact_id: p.child_text("artifactId").unwrap_or_default(),
            configuration: p.child("configuration").cloned(),
            executions: p
                .find_path(&["executions"])
                .map(|e| {
                    e.children_named("execution")
                        .map(|x| StepExecution {
                            id: x.child_text("id"),
                            configuration: x.child("configuration").cloned(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}
