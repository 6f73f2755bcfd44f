//! Entigen Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Entigen
//! model-driven generation engine, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          entigen-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerationService + Artifact Emitters) │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, DescriptorStore, Resolver) │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    entigen-adapters (Infrastructure)    │
//! │ (LocalFilesystem, XmlStore, MavenLookup)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (ProjectModel, Element tree, JavaSource)│
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use entigen_core::{
//!     application::{GenerateOptions, GenerationService},
//!     domain::ProjectModel,
//! };
//!
//! // 1. Load the model document
//! let model = ProjectModel::from_json(&model_json)?;
//!
//! // 2. Use the application service (with injected adapters)
//! let service = GenerationService::new(filesystem, descriptors, resolver, features);
//! let report = service.run(&model, None, None, "./app".as_ref(), &GenerateOptions::default())?;
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        GenerateOptions, GenerationContext, GenerationService, PhaseOutcome, RunReport,
        ports::{DependencyResolver, DescriptorStore, DriverArtifact, FeatureSource, Filesystem},
    };
    pub use crate::domain::{
        ApiModel, DataSourceModel, Element, EntityModel, FieldModel, FinderModel, Identity,
        JavaSource, ProjectModel, ProvisioningStyle, ViewModel,
    };
    pub use crate::error::{EntigenError, EntigenResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
