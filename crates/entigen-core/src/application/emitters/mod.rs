//! Artifact emitters - one module per output category.
//!
//! Each emitter consumes a slice of the loaded model and writes through the
//! `Filesystem` / `DescriptorStore` ports. Structured targets go through the
//! merge-aware tree primitives; generated sources go through [`JavaSource`].
//!
//! Emitters return `EntigenResult`; the orchestrator isolates each phase's
//! failure so one broken branch never aborts unrelated branches.

use std::path::{Path, PathBuf};

use crate::application::ports::Filesystem;
use crate::domain::JavaSource;
use crate::domain::source::package_dir;
use crate::error::EntigenResult;

pub mod datasource;
pub mod entity;
pub mod persistence;
pub mod pom;
pub mod repository;
pub mod resource;
pub mod service;
pub mod view;

/// Root of the generated source tree under the project base directory.
pub fn source_root(base: &Path) -> PathBuf {
    base.join("src").join("main").join("java")
}

/// Write a generated class to its package directory, creating parents.
pub fn write_source(
    fs: &dyn Filesystem,
    base: &Path,
    source: &JavaSource,
) -> EntigenResult<PathBuf> {
    let dir = package_dir(&source_root(base), &source.package);
    fs.create_dir_all(&dir)?;
    let path = dir.join(source.file_name());
    fs.write_file(&path, &source.render())?;
    Ok(path)
}

/// Import needed for a declared field type, if any.
pub(crate) fn import_for_type(ty: &str) -> Option<&'static str> {
    if ty.starts_with("List<") {
        Some("java.util.List")
    } else if ty == "BigDecimal" {
        Some("java.math.BigDecimal")
    } else if ty == "LocalDate" {
        Some("java.time.LocalDate")
    } else if ty == "LocalDateTime" {
        Some("java.time.LocalDateTime")
    } else {
        None
    }
}
