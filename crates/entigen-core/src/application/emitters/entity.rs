//! Persistent-entity class emitter.
//!
//! For each field, in declared order, emits the metadata markers in a fixed
//! sequence: primary-key marker (if flagged) → relation marker (if a join
//! token is present) → column marker with name and optional length (only
//! when there is no relation marker) → generated-value marker. Finders are
//! partitioned by the native flag and registered as named queries keyed
//! `"<Entity>.findBy<Finder>"`.

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::emitters::{import_for_type, write_source};
use crate::application::ports::Filesystem;
use crate::domain::model::FinderModel;
use crate::domain::source::capitalize;
use crate::domain::{EntityModel, JavaSource, MethodSpec, ProjectModel};
use crate::error::EntigenResult;

/// Generated-value strategy tokens, matched case-insensitively.
/// Unmatched tokens default to `AUTO`.
fn strategy(token: &str) -> &'static str {
    match token.to_ascii_uppercase().as_str() {
        "IDENTITY" => "IDENTITY",
        "SEQUENCE" => "SEQUENCE",
        "TABLE" => "TABLE",
        "UUID" => "UUID",
        _ => "AUTO",
    }
}

/// Emit one entity class per model entity. Returns the number of classes.
#[instrument(skip_all, fields(entities = model.entities.len()))]
pub fn emit(fs: &dyn Filesystem, model: &ProjectModel, base: &Path) -> EntigenResult<usize> {
    for entity in &model.entities {
        let source = entity_source(&model.package, entity);
        let path = write_source(fs, base, &source)?;
        debug!(entity = %entity.name, path = %path.display(), "entity emitted");
    }
    Ok(model.entities.len())
}

/// Assemble the class for one entity.
pub fn entity_source(package: &str, entity: &EntityModel) -> JavaSource {
    let mut source = JavaSource::class(format!("{package}.entity"), entity.name.clone());
    source.import("jakarta.persistence.Entity");
    source.annotate("@Entity");

    register_finders(&mut source, entity);

    for (name, field) in &entity.fields {
        let mut annotations = Vec::new();

        if field.pk {
            source.import("jakarta.persistence.Id");
            annotations.push("@Id".to_string());
        }

        if let Some(relation) = &field.relation {
            source.import(format!("jakarta.persistence.{relation}"));
            annotations.push(format!("@{relation}"));
        } else {
            // Column marker only in the absence of a relation marker.
            source.import("jakarta.persistence.Column");
            let column = field.column.as_deref().unwrap_or(name);
            match field.length {
                Some(length) => annotations
                    .push(format!("@Column(name = \"{column}\", length = {length})")),
                None => annotations.push(format!("@Column(name = \"{column}\")")),
            }
        }

        if let Some(token) = &field.generated {
            source.import("jakarta.persistence.GeneratedValue");
            source.import("jakarta.persistence.GenerationType");
            annotations.push(format!(
                "@GeneratedValue(strategy = GenerationType.{})",
                strategy(token)
            ));
        }

        if let Some(import) = import_for_type(&field.ty) {
            source.import(import);
        }
        source.add_field(annotations, format!("private {} {};", field.ty, name));
    }

    for (name, field) in &entity.fields {
        let cap = capitalize(name);
        source.add_method(
            MethodSpec::new(format!("public {} get{cap}()", field.ty))
                .line(format!("return {name};")),
        );
        source.add_method(
            MethodSpec::new(format!("public void set{cap}({} {name})", field.ty))
                .line(format!("this.{name} = {name};")),
        );
    }

    source
}

/// Partition finders by the native flag and emit one named-query
/// registration per finder.
fn register_finders(source: &mut JavaSource, entity: &EntityModel) {
    let (native, jpql): (Vec<_>, Vec<_>) =
        entity.finders.iter().partition(|(_, f)| f.native);

    for (name, finder) in &jpql {
        source.import("jakarta.persistence.NamedQuery");
        source.annotate(format!(
            "@NamedQuery(name = \"{}\", query = \"{}\")",
            FinderModel::query_key(&entity.name, name),
            escape(&finder.query)
        ));
    }
    for (name, finder) in &native {
        source.import("jakarta.persistence.NamedNativeQuery");
        source.annotate(format!(
            "@NamedNativeQuery(name = \"{}\", query = \"{}\")",
            FinderModel::query_key(&entity.name, name),
            escape(&finder.query)
        ));
    }
}

fn escape(query: &str) -> String {
    query.replace('\\', "\\\\").replace('"', "\\\"")
}

// ── tests ─────────────────────────────────────────────────────────────────────
