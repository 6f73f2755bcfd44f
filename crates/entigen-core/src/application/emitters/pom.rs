//! Build-descriptor mutations.
//!
//! The build descriptor is loaded once per run, mutated by successive
//! emitter calls in run order, and persisted exactly once at the end. Every
//! helper here goes through the tree's find-or-create primitives, so the
//! same run executed twice leaves the descriptor unchanged.
//!
//! Identity conventions: profiles by `id`, plugin and dependency entries by
//! group + artifact coordinate, nested configuration elements by name.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::ports::{DescriptorStore, DriverArtifact};
use crate::domain::{Element, Identity, ProjectModel};
use crate::error::EntigenResult;

pub const POM_FILE: &str = "pom.xml";

/// Load the project's build descriptor, or start a fresh one.
pub fn load_or_default(
    store: &dyn DescriptorStore,
    base: &Path,
    model: &ProjectModel,
) -> EntigenResult<(PathBuf, Element)> {
    let path = base.join(POM_FILE);
    match store.load(&path)? {
        Some(root) => {
            debug!(path = %path.display(), "merging into existing build descriptor");
            Ok((path, root))
        }
        None => Ok((path, default_pom(model))),
    }
}

/// A minimal war-packaged project root.
pub fn default_pom(model: &ProjectModel) -> Element {
    let mut project = Element::new("project");
    project.set_attr("xmlns", "http://maven.apache.org/POM/4.0.0");
    project.ensure_child_text("modelVersion", "4.0.0");
    project.ensure_child_text("groupId", model.package.clone());
    project.ensure_child_text("artifactId", model.name.clone());
    project.ensure_child_text("version", "1.0-SNAPSHOT");
    project.ensure_child_text("packaging", "war");

    let properties = project.find_or_create("properties", &Identity::ByName);
    properties.ensure_child_text("maven.compiler.release", "17");
    properties.ensure_child_text("project.build.sourceEncoding", "UTF-8");
    project
}

/// Ensure a dependency entry exists, keyed by its coordinate.
pub fn ensure_dependency(root: &mut Element, group: &str, artifact: &str, version: &str) {
    let dependencies = root.find_or_create("dependencies", &Identity::ByName);
    let dependency =
        dependencies.find_or_create("dependency", &Identity::by_coordinate(group, artifact));
    dependency.ensure_child_text("version", version);
}

/// Ensure the resolved database driver is a build dependency.
pub fn ensure_driver_dependency(root: &mut Element, driver: &DriverArtifact) {
    ensure_dependency(root, &driver.group_id, &driver.artifact_id, &driver.version);
}

/// Ensure a plugin entry exists under `build/plugins`, keyed by coordinate.
/// Returns the plugin element for nested configuration.
pub fn ensure_plugin<'a>(
    root: &'a mut Element,
    group: &str,
    artifact: &str,
    version: &str,
) -> &'a mut Element {
    let build = root.find_or_create("build", &Identity::ByName);
    let plugins = build.find_or_create("plugins", &Identity::ByName);
    let plugin = plugins.find_or_create("plugin", &Identity::by_coordinate(group, artifact));
    plugin.ensure_child_text("version", version);
    plugin
}

/// Ensure a profile keyed by id. Returns the profile element.
pub fn ensure_profile<'a>(root: &'a mut Element, id: &str) -> &'a mut Element {
    let profiles = root.find_or_create("profiles", &Identity::ByName);
    let position = profiles
        .children
        .iter()
        .position(|p| p.name == "profile" && p.child_text("id") == Some(id));
    match position {
        Some(idx) => &mut profiles.children[idx],
        None => {
            let profile = profiles.create_child("profile");
            profile.create_child_with_text("id", id);
            profile
        }
    }
}

/// Ensure a plugin entry under a profile's `build/plugins`.
pub fn ensure_profile_plugin<'a>(
    root: &'a mut Element,
    profile_id: &str,
    group: &str,
    artifact: &str,
    version: &str,
) -> &'a mut Element {
    let profile = ensure_profile(root, profile_id);
    ensure_plugin(profile, group, artifact, version)
}

/// The war packaging plugin every style needs.
pub fn ensure_war_plugin(root: &mut Element) {
    let plugin = ensure_plugin(root, "org.apache.maven.plugins", "maven-war-plugin", "3.4.0");
    let configuration = plugin.find_or_create("configuration", &Identity::ByName);
    configuration.ensure_child_text("failOnMissingWebXml", "false");
}

// ── tests ─────────────────────────────────────────────────────────────────────
