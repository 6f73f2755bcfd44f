//! Application layer errors.
//!
//! These errors represent failures in orchestration and I/O at the ports,
//! not business logic. Business logic errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {}: {reason}", path.display())]
    FilesystemError { path: PathBuf, reason: String },

    /// A descriptor could not be loaded or saved.
    #[error("Descriptor error at {}: {reason}", path.display())]
    DescriptorError { path: PathBuf, reason: String },

    /// The dependency-coordinate lookup failed.
    #[error("Dependency resolution failed for '{database}': {reason}")]
    ResolutionFailed { database: String, reason: String },

    /// The runtime-feature lookup failed.
    #[error("Feature lookup failed: {reason}")]
    FeatureLookupFailed { reason: String },

    /// A model document is missing from the given location.
    #[error("Model document not found at {}", path.display())]
    ModelNotFound { path: PathBuf },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the project directory exists".into(),
            ],
            Self::DescriptorError { path, .. } => vec![
                format!("Descriptor could not be processed: {}", path.display()),
                "Hand-edited descriptors must stay well-formed XML".into(),
            ],
            Self::ResolutionFailed { database, .. } => vec![
                format!("Could not resolve driver coordinates for '{database}'"),
                "Check your network connection, or run with --offline".into(),
            ],
            Self::FeatureLookupFailed { .. } => vec![
                "The runtime feature list could not be fetched".into(),
                "Run with --offline to use the built-in feature set".into(),
            ],
            Self::ModelNotFound { path } => vec![
                format!("No model document at: {}", path.display()),
                "Pass the document path with --model".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::DescriptorError { .. } => ErrorCategory::Internal,
            Self::ResolutionFailed { .. } | Self::FeatureLookupFailed { .. } => {
                ErrorCategory::NotFound
            }
            Self::ModelNotFound { .. } => ErrorCategory::NotFound,
        }
    }
}
