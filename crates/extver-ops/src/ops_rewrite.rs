//! Reference rewriting: own version, parent, properties, dependencies, build
//! step configuration and build output name.
//!
//! The same rules run against two targets: the in-memory [`Module`] and the
//! descriptor's `<project>` element. Each mutation is idempotent; running it
//! again with the same coordinate map changes nothing.

use extver_core::coordinate::CoordinateKey;
use extver_core::coordinate_map::CoordinateMap;
use extver_core::exclusion::ExclusionSet;
use extver_core::module::{Module, StepKind, DEFAULT_PLUGIN_GROUP};
use extver_core::version::VersionChange;
use extver_core::xml::XmlElement;
use extver_util::errors::{ExtverError, ExtverResult};

/// Everything the rewriter reads for one module.
#[derive(Debug, Clone, Copy)]
pub struct RewriteContext<'a> {
    pub change: &'a VersionChange,
    pub map: &'a CoordinateMap,
    pub exclusions: &'a ExclusionSet,
    pub properties_to_replace: &'a [String],
}

impl RewriteContext<'_> {
    /// New parent version, if the parent reference should move.
    ///
    /// An excluded parent is left alone. Otherwise the parent's own mapped
    /// version is used; failing that, a parent declared at the child's old
    /// version follows the child.
    pub fn parent_version(&self, group_id: &str, artifact_id: &str, version: &str) -> Option<String> {
        if self.exclusions.is_excluded(artifact_id) {
            return None;
        }
        let key = CoordinateKey::new(group_id, artifact_id, version);
        let target = match self.map.get(&key) {
            Some(mapped) => mapped.to_string(),
            None if self.change.matches_old(version) => self.change.new.clone(),
            None => return None,
        };
        (target != version).then_some(target)
    }

    /// Mapped version of a dependency declaration, if it differs.
    pub fn dependency_version(&self, key: &CoordinateKey) -> Option<&str> {
        self.map.get(key).filter(|v| *v != key.version)
    }
}

/// Rewrite the in-memory module. Returns the number of values changed.
pub fn rewrite_module(module: &mut Module, ctx: &RewriteContext<'_>) -> ExtverResult<usize> {
    if ctx.exclusions.is_excluded(&module.artifact_id) {
        return Ok(0);
    }
    let owner = module.to_string();
    let mut changes = 0;

    if module.version != ctx.change.new {
        module.version = ctx.change.new.clone();
        changes += 1;
    }

    if let Some(parent) = module.parent.as_mut() {
        if let Some(target) = ctx.parent_version(&parent.group_id, &parent.artifact_id, &parent.version) {
            tracing::debug!("{owner}: parent {}:{} -> {target}", parent.group_id, parent.artifact_id);
            parent.version = target;
            changes += 1;
        }
    }

    for name in ctx.properties_to_replace {
        if let Some(value) = module.properties.get_mut(name) {
            if *value != ctx.change.new {
                *value = ctx.change.new.clone();
                changes += 1;
            }
        }
    }

    for dependency in &mut module.dependencies {
        let Some(key) = dependency.coordinate() else {
            continue;
        };
        if let Some(target) = ctx.dependency_version(&key) {
            tracing::debug!("{owner}: dependency {key} -> {target}");
            dependency.version = Some(target.to_string());
            changes += 1;
        }
    }

    for step in &mut module.build_steps {
        let Some(kind) = step.kind() else {
            continue;
        };
        let plugin = step.artifact_id.clone();
        if kind == StepKind::Deploy {
            if let Some(config) = step.configuration.as_mut() {
                changes += rewrite_step_configuration(kind, config, ctx.change, &owner, &plugin)?;
            }
        }
        for execution in &mut step.executions {
            if let Some(config) = execution.configuration.as_mut() {
                changes += rewrite_step_configuration(kind, config, ctx.change, &owner, &plugin)?;
            }
        }
    }

    if let Some(name) = module.final_name.as_mut() {
        if let Some(renamed) = rename_output(name.as_str(), ctx.change) {
            *name = renamed;
            changes += 1;
        }
    }

    Ok(changes)
}

/// Rewrite a descriptor's `<project>` element for `module`.
///
/// `module` supplies interpolation and identity only; it is not modified.
/// Versions written as `${...}` expressions are kept.
pub fn rewrite_descriptor(
    project: &mut XmlElement,
    module: &Module,
    ctx: &RewriteContext<'_>,
) -> ExtverResult<usize> {
    if ctx.exclusions.is_excluded(&module.artifact_id) {
        return Ok(0);
    }
    let owner = module.to_string();
    let mut changes = 0;

    match project.child_mut("version") {
        Some(version) => changes += set_if_different(version, &ctx.change.new),
        None => {
            project.insert_after(
                "artifactId",
                XmlElement::with_text("version", ctx.change.new.as_str()),
            );
            changes += 1;
        }
    }

    if let Some(parent) = project.child_mut("parent") {
        let group_id = module.interpolate(&parent.child_text("groupId").unwrap_or_default());
        let artifact_id = module.interpolate(&parent.child_text("artifactId").unwrap_or_default());
        if let Some(version) = parent.child_mut("version") {
            let current = version.trimmed_text();
            if !is_expression(&current) {
                if let Some(target) = ctx.parent_version(&group_id, &artifact_id, &current) {
                    version.set_text(&target);
                    changes += 1;
                }
            }
        }
    }

    if let Some(properties) = project.child_mut("properties") {
        for name in ctx.properties_to_replace {
            if let Some(property) = properties.child_mut(name) {
                changes += set_if_different(property, &ctx.change.new);
            }
        }
    }

    if let Some(list) = project.child_mut("dependencies") {
        changes += rewrite_dependency_list(list, module, ctx);
    }
    if let Some(list) = project.find_path_mut(&["dependencyManagement", "dependencies"]) {
        changes += rewrite_dependency_list(list, module, ctx);
    }

    if let Some(build) = project.child_mut("build") {
        if let Some(plugins) = build.child_mut("plugins") {
            for plugin in plugins.children_named_mut("plugin") {
                changes += rewrite_plugin_element(plugin, ctx.change, &owner)?;
            }
        }
        if let Some(final_name) = build.child_mut("finalName") {
            if let Some(renamed) = rename_output(&final_name.trimmed_text(), ctx.change) {
                final_name.set_text(&renamed);
                changes += 1;
            }
        }
    }

    Ok(changes)
}

fn rewrite_dependency_list(list: &mut XmlElement, module: &Module, ctx: &RewriteContext<'_>) -> usize {
    let mut changes = 0;
    for dependency in list.children_named_mut("dependency") {
        let group_id = module.interpolate(&dependency.child_text("groupId").unwrap_or_default());
        let artifact_id = module.interpolate(&dependency.child_text("artifactId").unwrap_or_default());
        let Some(version) = dependency.child_mut("version") else {
            continue;
        };
        let current = version.trimmed_text();
        if is_expression(&current) {
            continue;
        }
        let key = CoordinateKey::new(group_id, artifact_id, current);
        if let Some(target) = ctx.dependency_version(&key) {
            version.set_text(target);
            changes += 1;
        }
    }
    changes
}

fn rewrite_plugin_element(
    plugin: &mut XmlElement,
    change: &VersionChange,
    owner: &str,
) -> ExtverResult<usize> {
    let group_id = plugin
        .child_text("groupId")
        .unwrap_or_else(|| DEFAULT_PLUGIN_GROUP.to_string());
    let artifact_id = plugin.child_text("artifactId").unwrap_or_default();
    let Some(kind) = StepKind::of(&group_id, &artifact_id) else {
        return Ok(0);
    };

    let mut changes = 0;
    for child in plugin.elements_mut() {
        match child.name.as_str() {
            "configuration" if kind == StepKind::Deploy => {
                changes += rewrite_step_configuration(kind, child, change, owner, &artifact_id)?;
            }
            "executions" => {
                for execution in child.children_named_mut("execution") {
                    if let Some(config) = execution.child_mut("configuration") {
                        changes +=
                            rewrite_step_configuration(kind, config, change, owner, &artifact_id)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(changes)
}

/// Apply the rules for one `<configuration>` block of a known build step.
///
/// A configuration without element children is a plain scalar and is skipped.
/// Entries that are present but have the wrong shape fail with a structural
/// error before anything in the block is changed.
pub fn rewrite_step_configuration(
    kind: StepKind,
    config: &mut XmlElement,
    change: &VersionChange,
    owner: &str,
    plugin: &str,
) -> ExtverResult<usize> {
    if !config.has_element_children() {
        return Ok(0);
    }
    let structural = |message: String| -> miette::Report {
        ExtverError::StructuralConfig {
            module: owner.to_string(),
            plugin: plugin.to_string(),
            message,
        }
        .into()
    };

    match kind {
        StepKind::Install => {
            ensure_scalar(config, "version").map_err(structural)?;
            ensure_scalar(config, "file").map_err(structural)?;
            let mut changes = rewrite_version_entry(config, change);
            if let Some(file) = config.child_mut("file") {
                let value = file.trimmed_text();
                if value.contains(&change.old) && !already_renamed(&value, change) {
                    file.set_text(&value.replace(&change.old, &change.new));
                    changes += 1;
                }
            }
            Ok(changes)
        }
        StepKind::Deploy => {
            ensure_scalar(config, "version").map_err(structural)?;
            Ok(rewrite_version_entry(config, change))
        }
        StepKind::DependencyCopy => {
            let Some(items) = config.child_mut("artifactItems") else {
                return Ok(0);
            };
            if !items.has_element_children() {
                if items.trimmed_text().is_empty() {
                    return Ok(0);
                }
                return Err(structural(
                    "<artifactItems> must contain <artifactItem> elements".to_string(),
                ));
            }
            for item in items.elements() {
                ensure_scalar(item, "version").map_err(structural)?;
            }
            Ok(items.elements_mut().map(|item| rewrite_version_entry(item, change)).sum())
        }
    }
}

fn ensure_scalar(parent: &XmlElement, name: &str) -> Result<(), String> {
    match parent.child(name) {
        Some(entry) if entry.has_element_children() => {
            Err(format!("<{name}> in <{}> must be a plain value", parent.name))
        }
        _ => Ok(()),
    }
}

fn rewrite_version_entry(config: &mut XmlElement, change: &VersionChange) -> usize {
    match config.child_mut("version") {
        Some(version) if change.matches_old(&version.trimmed_text()) && !change.is_noop() => {
            version.set_text(&change.new);
            1
        }
        _ => 0,
    }
}

/// Replace the first occurrence of the old version in a build output name.
fn rename_output(name: &str, change: &VersionChange) -> Option<String> {
    if change.is_noop() || !name.contains(&change.old) || already_renamed(name, change) {
        return None;
    }
    Some(name.replacen(&change.old, &change.new, 1))
}

/// A value that already carries the new version is done, but only when the
/// new version embeds the old one; otherwise the old version still has to go.
fn already_renamed(value: &str, change: &VersionChange) -> bool {
    change.new.contains(&change.old) && value.contains(&change.new)
}

fn set_if_different(element: &mut XmlElement, value: &str) -> usize {
    if element.trimmed_text() == value {
        0
    } else {
        element.set_text(value);
        1
    }
}

fn is_expression(value: &str) -> bool {
    value.contains("${")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_output_first_occurrence_only() {
        let change = VersionChange::new("1.0", "2.0");
        assert_eq!(rename_output("app-1.0-1.0", &change).as_deref(), Some("app-2.0-1.0"));
        assert_eq!(rename_output("app", &change), None);
    }

    #[test]
    fn rename_output_is_idempotent_when_new_contains_old() {
        let change = VersionChange::new("1.0", "1.0.1");
        let once = rename_output("app-1.0", &change).unwrap();
        assert_eq!(once, "app-1.0.1");
        assert_eq!(rename_output(&once, &change), None);
    }

    #[test]
    fn rename_output_when_new_is_part_of_old() {
        let change = VersionChange::new("1.0.1", "1.0");
        assert_eq!(rename_output("app-1.0.1", &change).as_deref(), Some("app-1.0"));
        assert_eq!(rename_output("app-1.0", &change), None);
    }

    #[test]
    fn expressions_are_detected() {
        assert!(is_expression("${project.version}"));
        assert!(!is_expression("1.0"));
    }
}
