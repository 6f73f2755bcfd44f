//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `entigen-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::Element;
use crate::error::EntigenResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `entigen_adapters::filesystem::LocalFilesystem` (production)
/// - `entigen_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Emitters both write fresh sources and merge into pre-existing,
///   hand-edited ones, so reading is part of the contract.
/// - Writes are per-artifact; there is no cross-artifact transaction.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> EntigenResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()>;

    /// Read a file to a string.
    fn read_file(&self, path: &Path) -> EntigenResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Port for loading and persisting structured descriptor trees.
///
/// Implemented by:
/// - `entigen_adapters::descriptor::XmlDescriptorStore` (quick-xml backed)
///
/// Load is lazy and merge-friendly: a missing descriptor yields `None` so
/// the caller can start from its default root. Persistence is explicit -
/// the tree primitives themselves never write.
#[cfg_attr(test, mockall::automock)]
pub trait DescriptorStore: Send + Sync {
    /// Load a descriptor tree, or `None` if the file does not exist.
    fn load(&self, path: &Path) -> EntigenResult<Option<Element>>;

    /// Persist a descriptor tree.
    fn save(&self, path: &Path, root: &Element) -> EntigenResult<()>;
}

/// Resolved build coordinates and driver class for a logical database name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub driver_class: String,
}

/// Port for the dependency-coordinate lookup (external collaborator).
///
/// Implemented by:
/// - `entigen_adapters::resolver::MavenCentralResolver` (network)
/// - `entigen_adapters::resolver::StaticResolver` (offline table)
///
/// The call is synchronous and blocking; the application memoizes results
/// per run through [`crate::application::GenerationContext`], so adapters
/// need no caching of their own.
#[cfg_attr(test, mockall::automock)]
pub trait DependencyResolver: Send + Sync {
    /// Resolve a logical database name to driver coordinates.
    fn resolve(&self, database: &str) -> EntigenResult<DriverArtifact>;
}

/// Port for the runtime feature list (Liberty-style server descriptor).
///
/// Implemented by:
/// - `entigen_adapters::features::RemoteFeatureSource` (remote config document)
/// - `entigen_adapters::features::StaticFeatureSource` (built-in list)
#[cfg_attr(test, mockall::automock)]
pub trait FeatureSource: Send + Sync {
    /// The feature names to copy verbatim into the runtime descriptor.
    fn features(&self) -> EntigenResult<Vec<String>>;
}
