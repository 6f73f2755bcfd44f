//! Domain layer - pure business logic, no I/O.
//!
//! Three families of types live here:
//!
//! - the declarative **models** (`model/`): what the user asked to generate,
//!   parsed once per run and immutable afterwards;
//! - the merge-aware **document tree** (`tree`): the mutable target for
//!   structured descriptors, with find-or-create primitives that make every
//!   descriptor mutation idempotent;
//! - the structured **source builder** (`source`): generated-class assembly
//!   with an explicit printing policy, so emitters never concatenate raw
//!   strings and tests can assert on structure.

pub mod error;
pub mod model;
pub mod source;
pub mod tree;

pub use error::{DomainError, ErrorCategory};
pub use model::{
    ApiModel, DataSourceModel, EntityModel, FieldModel, FinderModel, FormFieldModel,
    OperationModel, OrderedMap, ParameterModel, PathModel, ProjectModel, ProvisioningStyle,
    ViewEntry, ViewModel,
};
pub use source::{JavaSource, MethodSpec};
pub use tree::{Element, Identity};
