//! Declarative model documents.
//!
//! # Design
//!
//! These are pure data types - parsed once per generation run via serde and
//! read-only afterwards. All mutation happens on *target* artifacts, never on
//! the loaded model. Shape validation lives in [`ProjectModel::validate`];
//! the parsers themselves only reject malformed JSON.
//!
//! Every name-keyed mapping preserves the insertion order of the source
//! document ([`OrderedMap`]); field order, finder order and parameter order
//! are all significant to the emitters downstream.

use serde::{Deserialize, Deserializer, de::MapAccess, de::Visitor};
use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

pub mod api;
pub mod view;

pub use api::{ApiModel, OperationModel, ParameterModel, PathModel};
pub use view::{FormFieldModel, ViewEntry, ViewModel};

// ── Ordered maps ──────────────────────────────────────────────────────────────

/// A name-keyed mapping that preserves document order.
///
/// JSON objects deserialize into this through [`ordered_map`]; iteration
/// order is exactly the order the keys appeared in the source document.
pub type OrderedMap<T> = Vec<(String, T)>;

/// Deserialize a JSON object into an [`OrderedMap`], keeping key order.
pub fn ordered_map<'de, D, T>(deserializer: D) -> Result<OrderedMap<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct OrderedVisitor<T>(std::marker::PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedVisitor<T> {
        type Value = OrderedMap<T>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(std::marker::PhantomData))
}

/// Lookup by key in an [`OrderedMap`].
pub fn lookup<'a, T>(map: &'a OrderedMap<T>, key: &str) -> Option<&'a T> {
    map.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

// ── Project model ─────────────────────────────────────────────────────────────

/// Root of a generation run: package, project name, entities, datasource.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectModel {
    /// Base package for all generated sources, e.g. `com.example.shop`.
    pub package: String,
    /// Project name; doubles as the build artifact id.
    pub name: String,
    #[serde(default)]
    pub entities: Vec<EntityModel>,
    pub datasource: DataSourceModel,
}

/// One persistent entity.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityModel {
    pub name: String,
    /// Field name → field, in declaration order.
    #[serde(default, deserialize_with = "ordered_map")]
    pub fields: OrderedMap<FieldModel>,
    /// Finder name → finder, in declaration order.
    #[serde(default, deserialize_with = "ordered_map")]
    pub finders: OrderedMap<FinderModel>,
}

/// One entity field.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldModel {
    /// Declared type, e.g. `String`, `Long`, `BigDecimal`.
    #[serde(rename = "type")]
    pub ty: String,
    /// Column name override; defaults to the field name.
    #[serde(default)]
    pub column: Option<String>,
    /// Primary-key flag. At most one per entity (validated).
    #[serde(default)]
    pub pk: bool,
    #[serde(default)]
    pub length: Option<u32>,
    /// Generated-value strategy token, matched case-insensitively.
    #[serde(default)]
    pub generated: Option<String>,
    /// Relation/join annotation token, e.g. `OneToMany` or `ManyToOne`.
    #[serde(default)]
    pub relation: Option<String>,
}

/// One registered finder (named query).
#[derive(Debug, Clone, Deserialize)]
pub struct FinderModel {
    pub query: String,
    #[serde(default)]
    pub native: bool,
    #[serde(default)]
    pub unique: bool,
    /// Declared return element type; defaults to the owning entity.
    #[serde(default)]
    pub returns: Option<String>,
    /// Parameter name → parameter type, in declaration order.
    #[serde(default, deserialize_with = "ordered_map")]
    pub params: OrderedMap<String>,
}

/// Datasource connection and provisioning configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSourceModel {
    /// Logical database name, resolved to driver coordinates at run time.
    pub database: String,
    pub url: String,
    pub user: String,
    pub password: String,
    /// Provisioning style token. Kept as the raw token so an unknown value
    /// skips the provisioning phase instead of failing the whole load.
    pub style: String,
    /// Extra connection properties, in declaration order.
    #[serde(default, deserialize_with = "ordered_map")]
    pub properties: OrderedMap<String>,
}

impl ProjectModel {
    /// Parse a project model document.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| DomainError::ModelUnparseable(e.to_string()))
    }

    /// Shape validation beyond what serde enforces.
    ///
    /// - entity names unique within the project
    /// - at most one primary-key field per entity
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.package.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "package" });
        }
        if self.name.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }

        let mut seen = std::collections::HashSet::new();
        for entity in &self.entities {
            if !seen.insert(entity.name.as_str()) {
                return Err(DomainError::DuplicateEntity {
                    name: entity.name.clone(),
                });
            }

            let pk_count = entity.fields.iter().filter(|(_, f)| f.pk).count();
            if pk_count > 1 {
                return Err(DomainError::MultiplePrimaryKeys {
                    entity: entity.name.clone(),
                    count: pk_count,
                });
            }
        }
        Ok(())
    }
}

impl EntityModel {
    /// The primary-key field, if one is flagged.
    pub fn primary_key(&self) -> Option<(&str, &FieldModel)> {
        self.fields
            .iter()
            .find(|(_, f)| f.pk)
            .map(|(n, f)| (n.as_str(), f))
    }

    /// The declared identifier type, defaulting to `Object` when no field
    /// is flagged as primary key.
    pub fn id_type(&self) -> &str {
        self.primary_key().map_or("Object", |(_, f)| f.ty.as_str())
    }
}

impl FinderModel {
    /// The named-query registration key for this finder on `entity`.
    pub fn query_key(entity: &str, finder: &str) -> String {
        format!("{entity}.findBy{finder}")
    }
}

// ── Provisioning style ────────────────────────────────────────────────────────

/// How the datasource is declared to the target runtime.
///
/// Mutually exclusive; selected once per run and never re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisioningStyle {
    /// Inline `data-source` element in the web deployment descriptor.
    Web,
    /// Open Liberty runtime server descriptor plus build-plugin copy step.
    OpenLiberty,
    /// Payara static resources descriptor (or micro post-boot script).
    PayaraResources,
}

impl ProvisioningStyle {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "WEB",
            Self::OpenLiberty => "OPENLIBERTY",
            Self::PayaraResources => "PAYARA_RESOURCES",
        }
    }
}

impl fmt::Display for ProvisioningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProvisioningStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "WEB" => Ok(Self::Web),
            "OPENLIBERTY" | "OPEN_LIBERTY" | "LIBERTY" => Ok(Self::OpenLiberty),
            "PAYARA_RESOURCES" | "PAYARA" => Ok(Self::PayaraResources),
            other => Err(DomainError::UnsupportedStyle {
                token: other.to_string(),
            }),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
