//! Service class emitter.
//!
//! One application-scoped service per entity, delegating CRUD to the
//! injected repository. Kept deliberately thin - business logic belongs to
//! the generated application's developers, not to the generator.

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::emitters::write_source;
use crate::application::ports::Filesystem;
use crate::domain::{EntityModel, JavaSource, MethodSpec, ProjectModel};
use crate::error::EntigenResult;

/// Emit one service class per model entity. Returns the class count.
#[instrument(skip_all, fields(entities = model.entities.len()))]
pub fn emit(fs: &dyn Filesystem, model: &ProjectModel, base: &Path) -> EntigenResult<usize> {
    for entity in &model.entities {
        let source = service_source(&model.package, entity);
        let path = write_source(fs, base, &source)?;
        debug!(entity = %entity.name, path = %path.display(), "service emitted");
    }
    Ok(model.entities.len())
}

/// Assemble the service class for one entity.
pub fn service_source(package: &str, entity: &EntityModel) -> JavaSource {
    let name = &entity.name;
    let id_type = entity.id_type();
    let mut source = JavaSource::class(format!("{package}.service"), format!("{name}Service"));
    source.import("jakarta.enterprise.context.ApplicationScoped");
    source.import("jakarta.inject.Inject");
    source.import("jakarta.transaction.Transactional");
    source.import(format!("{package}.entity.{name}"));
    source.import(format!("{package}.repository.{name}Repository"));
    source.import("java.util.List");
    source.annotate("@ApplicationScoped");

    source.add_field(
        vec!["@Inject".into()],
        format!("private {name}Repository repository;"),
    );

    source.add_method(
        MethodSpec::new(format!("public {name} create({name} entity)"))
            .annotate("@Transactional")
            .line("return repository.create(entity);"),
    );
    source.add_method(
        MethodSpec::new(format!("public {name} find({id_type} id)"))
            .line("return repository.find(id);"),
    );
    source.add_method(
        MethodSpec::new(format!("public {name} update({name} entity)"))
            .annotate("@Transactional")
            .line("return repository.update(entity);"),
    );
    source.add_method(
        MethodSpec::new(format!("public void delete({id_type} id)"))
            .annotate("@Transactional")
            .line("repository.delete(id);"),
    );
    source.add_method(
        MethodSpec::new(format!("public List<{name}> findAll()"))
            .line("return repository.findAll();"),
    );

    source
}
