//! Data-access (repository) class emitter.
//!
//! The identifier type of each repository is the declared type of the field
//! marked primary key, defaulting to `Object` when none is marked. Finder
//! methods route through the native-query construction path when
//! `native=true`, else through the named-query path, referencing the same
//! `"<Entity>.findBy<Finder>"` key the entity registered.

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::emitters::write_source;
use crate::application::ports::Filesystem;
use crate::domain::model::FinderModel;
use crate::domain::{EntityModel, JavaSource, MethodSpec, ProjectModel};
use crate::error::EntigenResult;

/// Emit one repository class per model entity. Returns the class count.
#[instrument(skip_all, fields(entities = model.entities.len()))]
pub fn emit(fs: &dyn Filesystem, model: &ProjectModel, base: &Path) -> EntigenResult<usize> {
    for entity in &model.entities {
        let source = repository_source(&model.package, entity);
        let path = write_source(fs, base, &source)?;
        debug!(entity = %entity.name, path = %path.display(), "repository emitted");
    }
    Ok(model.entities.len())
}

/// Assemble the repository class for one entity.
pub fn repository_source(package: &str, entity: &EntityModel) -> JavaSource {
    let name = &entity.name;
    let id_type = entity.id_type();
    let mut source = JavaSource::class(
        format!("{package}.repository"),
        format!("{name}Repository"),
    );
    source.import("jakarta.enterprise.context.ApplicationScoped");
    source.import("jakarta.persistence.EntityManager");
    source.import("jakarta.persistence.PersistenceContext");
    source.import(format!("{package}.entity.{name}"));
    source.import("java.util.List");
    source.annotate("@ApplicationScoped");

    source.add_field(
        vec!["@PersistenceContext".into()],
        "private EntityManager em;",
    );

    source.add_method(
        MethodSpec::new(format!("public {name} create({name} entity)"))
            .line("em.persist(entity);")
            .line("return entity;"),
    );
    source.add_method(
        MethodSpec::new(format!("public {name} find({id_type} id)"))
            .line(format!("return em.find({name}.class, id);")),
    );
    source.add_method(
        MethodSpec::new(format!("public {name} update({name} entity)"))
            .line("return em.merge(entity);"),
    );
    source.add_method(
        MethodSpec::new(format!("public void delete({id_type} id)"))
            .line(format!("em.remove(em.find({name}.class, id));")),
    );
    source.add_method(
        MethodSpec::new(format!("public List<{name}> findAll()")).line(format!(
            "return em.createQuery(\"SELECT e FROM {name} e\", {name}.class).getResultList();"
        )),
    );

    for (finder_name, finder) in &entity.finders {
        source.add_method(finder_method(name, finder_name, finder));
    }

    source
}

/// One `findBy<Finder>` method, parameters reconstructed in map order.
fn finder_method(entity: &str, finder_name: &str, finder: &FinderModel) -> MethodSpec {
    let returns = finder.returns.as_deref().unwrap_or(entity);
    let element_type = returns.to_string();
    let return_type = if finder.unique {
        element_type.clone()
    } else {
        format!("List<{element_type}>")
    };

    let params = finder
        .params
        .iter()
        .map(|(name, ty)| format!("{ty} {name}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut method = MethodSpec::new(format!(
        "public {return_type} findBy{finder_name}({params})"
    ));

    if finder.native {
        method = method.line(format!(
            "var query = em.createNativeQuery(\"{}\", {element_type}.class);",
            escape(&finder.query)
        ));
    } else {
        method = method.line(format!(
            "var query = em.createNamedQuery(\"{}\", {element_type}.class);",
            FinderModel::query_key(entity, finder_name)
        ));
    }

    for (param, _) in &finder.params {
        method = method.line(format!("query.setParameter(\"{param}\", {param});"));
    }

    if finder.unique {
        method.line(format!("return ({element_type}) query.getSingleResult();"))
    } else {
        method.line("return query.getResultList();")
    }
}

fn escape(query: &str) -> String {
    query.replace('\\', "\\\\").replace('"', "\\\"")
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldModel;

    fn field(ty: &str, pk: bool) -> FieldModel {
        FieldModel {
            ty: ty.into(),
            column: None,
            pk,
            length: None,
            generated: None,
            relation: None,
        }
    }

    fn finder(native: bool, unique: bool) -> FinderModel {
        FinderModel {
            query: "SELECT c FROM Customer c WHERE c.email = :email".into(),
            native,
            unique,
            returns: None,
            params: vec![("email".into(), "String".into())],
        }
    }

    fn entity_with(finders: Vec<(String, FinderModel)>) -> EntityModel {
        EntityModel {
            name: "Customer".into(),
            fields: vec![("id".into(), field("Long", true))],
            finders,
        }
    }

    #[test]
    fn identifier_type_follows_primary_key() {
        let text = repository_source("com.example", &entity_with(Vec::new())).render();
        assert!(text.contains("public Customer find(Long id)"));
        assert!(text.contains("public void delete(Long id)"));
    }

    #[test]
    fn identifier_type_defaults_to_object() {
        let entity = EntityModel {
            name: "Tag".into(),
            fields: vec![("label".into(), field("String", false))],
            finders: Vec::new(),
        };
        let text = repository_source("com.example", &entity).render();
        assert!(text.contains("public Tag find(Object id)"));
    }

    #[test]
    fn unique_finder_uses_single_result() {
        let method = finder_method("Customer", "Email", &finder(false, true));
        let text = method.render(0);
        assert!(text.contains("public Customer findByEmail(String email)"));
        assert!(text.contains("em.createNamedQuery(\"Customer.findByEmail\", Customer.class);"));
        assert!(text.contains("query.setParameter(\"email\", email);"));
        assert!(text.contains("getSingleResult()"));
        assert!(!text.contains("getResultList()"));
    }

    #[test]
    fn list_finder_uses_result_list() {
        let text = finder_method("Customer", "Email", &finder(false, false)).render(0);
        assert!(text.contains("public List<Customer> findByEmail(String email)"));
        assert!(text.contains("getResultList()"));
    }

    #[test]
    fn native_finder_routes_through_native_path() {
        let text = finder_method("Customer", "Email", &finder(true, false)).render(0);
        assert!(text.contains("em.createNativeQuery("));
        assert!(!text.contains("createNamedQuery"));
    }

    #[test]
    fn parameters_bound_in_map_order() {
        let mut f = finder(false, false);
        f.params = vec![
            ("min".into(), "Integer".into()),
            ("max".into(), "Integer".into()),
        ];
        let text = finder_method("Customer", "Range", &f).render(0);
        assert!(text.contains("public List<Customer> findByRange(Integer min, Integer max)"));
        let min = text.find("setParameter(\"min\"").unwrap();
        let max = text.find("setParameter(\"max\"").unwrap();
        assert!(min < max);
    }
}
