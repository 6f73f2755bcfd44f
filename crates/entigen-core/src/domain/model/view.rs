//! View-layer model: form-bean shapes and view holders.

use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::model::{OrderedMap, ordered_map};

/// The view model document.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewModel {
    /// Form-group name → ordered field list.
    #[serde(default, deserialize_with = "ordered_map")]
    pub forms: OrderedMap<Vec<FormFieldModel>>,
    /// View path → view entry.
    #[serde(default, deserialize_with = "ordered_map")]
    pub views: OrderedMap<ViewEntry>,
}

/// One field in a form group.
#[derive(Debug, Clone, Deserialize)]
pub struct FormFieldModel {
    pub name: String,
    /// Logical type token, e.g. `text`, `number`, `decimal`, `date`.
    #[serde(rename = "type", default = "default_token")]
    pub ty: String,
    /// Validation keywords: `required`, `email`, `past`, `future`,
    /// `min:N`, `max:N`, `pattern:REGEX`.
    #[serde(default)]
    pub validate: Vec<String>,
}

fn default_token() -> String {
    "text".into()
}

/// One view entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewEntry {
    /// `"list"` selects a collection-shaped, session-scoped holder;
    /// anything else (or absence) selects a singular, request-scoped one.
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    /// The form group this view presents.
    pub form: String,
}

impl ViewEntry {
    pub fn is_list(&self) -> bool {
        self.ty.as_deref() == Some("list")
    }
}

impl ViewModel {
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| DomainError::ModelUnparseable(e.to_string()))
    }
}

/// Map a logical form-field type token to a concrete field type.
pub fn concrete_type(token: &str) -> &'static str {
    match token.to_ascii_lowercase().as_str() {
        "number" | "integer" => "Integer",
        "long" => "Long",
        "decimal" => "java.math.BigDecimal",
        "date" => "java.time.LocalDate",
        "datetime" => "java.time.LocalDateTime",
        "boolean" | "checkbox" => "Boolean",
        // text, email, password, unrecognized tokens
        _ => "String",
    }
}
