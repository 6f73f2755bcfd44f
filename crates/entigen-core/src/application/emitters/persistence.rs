//! Persistence-unit descriptor emitter.
//!
//! Unlike every other descriptor target, `persistence.xml` is overwritten
//! wholesale each run - the unit name and datasource reference are fully
//! derived from the model, so there is nothing hand-edited to merge with.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::application::ports::DescriptorStore;
use crate::domain::{Element, ProjectModel};
use crate::error::EntigenResult;

/// Location of the persistence descriptor under the project base.
pub fn descriptor_path(base: &Path) -> PathBuf {
    base.join("src")
        .join("main")
        .join("resources")
        .join("META-INF")
        .join("persistence.xml")
}

/// Write the persistence descriptor. Returns the written path.
#[instrument(skip_all)]
pub fn emit(
    store: &dyn DescriptorStore,
    model: &ProjectModel,
    base: &Path,
) -> EntigenResult<PathBuf> {
    let path = descriptor_path(base);
    let root = persistence_unit(model);
    store.save(&path, &root)?;
    debug!(path = %path.display(), "persistence descriptor written");
    Ok(path)
}

/// One persistence-unit element with name and datasource reference.
pub fn persistence_unit(model: &ProjectModel) -> Element {
    let mut root = Element::new("persistence");
    root.set_attr("xmlns", "https://jakarta.ee/xml/ns/persistence");
    root.set_attr("version", "3.0");

    let unit = root.create_child("persistence-unit");
    unit.set_attr("name", format!("{}PU", model.name));
    unit.set_attr("transaction-type", "JTA");
    unit.create_child_with_text(
        "jta-data-source",
        format!("java:app/jdbc/{}", model.datasource.database),
    );
    root
}
