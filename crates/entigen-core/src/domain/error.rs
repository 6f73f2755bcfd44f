// ============================================================================
// domain/error.rs - COMPREHENSIVE ERROR DOMAIN
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for reporting the same failure in the run report and the log)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Model Errors (400-level equivalent)
    // ========================================================================
    #[error("Model document could not be parsed: {0}")]
    ModelUnparseable(String),

    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Duplicate entity name: {name}")]
    DuplicateEntity { name: String },

    #[error("Entity '{entity}' declares {count} primary-key fields; at most one is allowed")]
    MultiplePrimaryKeys { entity: String, count: usize },

    // ========================================================================
    // Lookup Errors (404-level equivalent)
    // ========================================================================
    #[error("Unsupported provisioning style: '{token}'")]
    UnsupportedStyle { token: String },

    #[error("Schema reference '{reference}' does not name an emitted schema type")]
    UnresolvedSchemaRef { reference: String },

    #[error("No database driver is known for '{database}'")]
    UnknownDatabase { database: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ModelUnparseable(msg) => vec![
                "The model document is not valid JSON or has the wrong shape".into(),
                format!("Details: {}", msg),
            ],
            Self::MultiplePrimaryKeys { entity, .. } => vec![
                format!("Entity '{}' may flag at most one field with \"pk\": true", entity),
                "Remove the extra primary-key flags or model a composite key explicitly".into(),
            ],
            Self::UnsupportedStyle { token } => vec![
                format!("'{}' is not a provisioning style", token),
                "Supported styles: WEB, OPENLIBERTY, PAYARA_RESOURCES".into(),
            ],
            Self::UnresolvedSchemaRef { reference } => vec![
                format!("'{}' is referenced by an operation but never declared", reference),
                "Add it to the \"schemas\" section of the API model".into(),
            ],
            Self::UnknownDatabase { database } => vec![
                format!("No driver coordinates are known for '{}'", database),
                "Check the \"database\" value in the datasource model".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ModelUnparseable(_)
            | Self::InvalidModel(_)
            | Self::DuplicateEntity { .. }
            | Self::MultiplePrimaryKeys { .. } => ErrorCategory::Validation,
            Self::UnsupportedStyle { .. }
            | Self::UnresolvedSchemaRef { .. }
            | Self::UnknownDatabase { .. } => ErrorCategory::NotFound,
            Self::MissingRequiredField { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
