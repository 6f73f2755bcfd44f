//! API-surface model: paths, operations, schemas.

use serde::Deserialize;

use crate::domain::error::DomainError;
use crate::domain::model::{OrderedMap, ordered_map};

/// The API model document: path → operations, schema name → properties.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiModel {
    /// Path key → path item, in document order. The order matters: the
    /// shared root prefix is computed against the *first* path.
    #[serde(default, deserialize_with = "ordered_map")]
    pub paths: OrderedMap<PathModel>,
    /// Schema name → property name → property type, for generated
    /// request/response types.
    #[serde(default, deserialize_with = "ordered_map_of_maps")]
    pub schemas: OrderedMap<OrderedMap<String>>,
}

/// One path item: up to one operation per HTTP verb.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathModel {
    #[serde(default)]
    pub get: Option<OperationModel>,
    #[serde(default)]
    pub post: Option<OperationModel>,
    #[serde(default)]
    pub put: Option<OperationModel>,
    #[serde(default)]
    pub delete: Option<OperationModel>,
}

impl PathModel {
    /// The single operation handled for this path item, checked in fixed
    /// GET → POST → PUT → DELETE priority order.
    pub fn operation(&self) -> Option<(&'static str, &OperationModel)> {
        if let Some(op) = &self.get {
            Some(("GET", op))
        } else if let Some(op) = &self.post {
            Some(("POST", op))
        } else if let Some(op) = &self.put {
            Some(("PUT", op))
        } else {
            self.delete.as_ref().map(|op| ("DELETE", op))
        }
    }
}

/// One operation on a path.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationModel {
    /// Operation identifier; also the dedup key when merging methods into
    /// an existing resource class.
    #[serde(rename = "operationId", default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterModel>,
    /// Request-body schema reference (a schema name).
    #[serde(default)]
    pub body: Option<String>,
    /// Default-response schema reference: a schema name, or `Name[]` for
    /// an array of that schema.
    #[serde(default)]
    pub response: Option<String>,
}

/// One declared operation parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct ParameterModel {
    pub name: String,
    /// Parameter location: `path` or `query`.
    #[serde(rename = "in", default = "default_location")]
    pub location: String,
    #[serde(rename = "type", default = "default_param_type")]
    pub ty: String,
}

fn default_location() -> String {
    "query".into()
}

fn default_param_type() -> String {
    "String".into()
}

impl ApiModel {
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| DomainError::ModelUnparseable(e.to_string()))
    }

    /// Look up a schema by name.
    pub fn schema(&self, name: &str) -> Option<&OrderedMap<String>> {
        crate::domain::model::lookup(&self.schemas, name)
    }
}

fn ordered_map_of_maps<'de, D>(
    deserializer: D,
) -> Result<OrderedMap<OrderedMap<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    // Two levels of document-ordered objects: schema name → properties.
    #[derive(Deserialize)]
    struct Inner(#[serde(deserialize_with = "ordered_map")] OrderedMap<String>);

    let outer: OrderedMap<Inner> = ordered_map(deserializer)?;
    Ok(outer.into_iter().map(|(k, Inner(v))| (k, v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const API: &str = r#"{
        "paths": {
            "/api/users": {
                "get": { "operationId": "listUsers", "response": "User[]" },
                "post": { "operationId": "createUser", "body": "UserRequest", "response": "User" }
            },
            "/api/users/{id}": {
                "get": {
                    "operationId": "getUser",
                    "parameters": [ { "name": "id", "in": "path", "type": "Long" } ],
                    "response": "User"
                }
            }
        },
        "schemas": {
            "User": { "id": "Long", "name": "String" },
            "UserRequest": { "name": "String" }
        }
    }"#;

    #[test]
    fn parses_api_model() {
        let api = ApiModel::from_json(API).unwrap();
        assert_eq!(api.paths.len(), 2);
        assert_eq!(api.schemas.len(), 2);
        assert_eq!(api.schema("User").unwrap().len(), 2);
    }

    #[test]
    fn operation_priority_get_wins_over_post() {
        let api = ApiModel::from_json(API).unwrap();
        let (verb, op) = api.paths[0].1.operation().unwrap();
        assert_eq!(verb, "GET");
        assert_eq!(op.operation_id.as_deref(), Some("listUsers"));
    }

    #[test]
    fn path_parameter_location() {
        let api = ApiModel::from_json(API).unwrap();
        let (_, op) = api.paths[1].1.operation().unwrap();
        assert_eq!(op.parameters[0].location, "path");
        assert_eq!(op.parameters[0].ty, "Long");
    }
}
