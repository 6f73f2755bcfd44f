//! Infrastructure adapters for Entigen.
//!
//! This crate implements the ports defined in `entigen-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod descriptor;
pub mod features;
pub mod filesystem;
pub mod resolver;

// Re-export commonly used adapters
pub use descriptor::XmlDescriptorStore;
pub use features::{RemoteFeatureSource, StaticFeatureSource};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use resolver::{MavenCentralResolver, StaticResolver};
