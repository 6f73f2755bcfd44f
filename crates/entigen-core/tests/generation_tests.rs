//! Integration tests for entigen-core.
//!
//! The service is exercised end-to-end against in-memory port doubles, so
//! every assertion is on artifact content, not on filesystem side effects.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use entigen_core::application::ApplicationError;
use entigen_core::application::ports::{
    DependencyResolver, DescriptorStore, DriverArtifact, FeatureSource, Filesystem,
};
use entigen_core::application::{GenerateOptions, GenerationService};
use entigen_core::domain::{ApiModel, Element, ProjectModel, ViewModel};
use entigen_core::error::EntigenResult;

// ── port doubles ──────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct MemFs {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
}

impl MemFs {
    fn read(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl Filesystem for MemFs {
    fn create_dir_all(&self, _path: &Path) -> EntigenResult<()> {
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> EntigenResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> EntigenResult<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| {
                ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "not found".into(),
                }
                .into()
            })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

#[derive(Clone, Default)]
struct MemDescriptors {
    trees: Arc<Mutex<HashMap<PathBuf, Element>>>,
}

impl MemDescriptors {
    fn tree(&self, path: &str) -> Option<Element> {
        self.trees.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl DescriptorStore for MemDescriptors {
    fn load(&self, path: &Path) -> EntigenResult<Option<Element>> {
        Ok(self.trees.lock().unwrap().get(path).cloned())
    }

    fn save(&self, path: &Path, root: &Element) -> EntigenResult<()> {
        self.trees
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), root.clone());
        Ok(())
    }
}

struct StubResolver;

impl DependencyResolver for StubResolver {
    fn resolve(&self, _database: &str) -> EntigenResult<DriverArtifact> {
        Ok(DriverArtifact {
            group_id: "org.postgresql".into(),
            artifact_id: "postgresql".into(),
            version: "42.7.3".into(),
            driver_class: "org.postgresql.ds.PGSimpleDataSource".into(),
        })
    }
}

struct FailingResolver;

impl DependencyResolver for FailingResolver {
    fn resolve(&self, database: &str) -> EntigenResult<DriverArtifact> {
        Err(ApplicationError::ResolutionFailed {
            database: database.into(),
            reason: "registry unreachable".into(),
        }
        .into())
    }
}

struct StubFeatures;

impl FeatureSource for StubFeatures {
    fn features(&self) -> EntigenResult<Vec<String>> {
        Ok(vec!["jakartaee-10.0".into(), "microProfile-6.1".into()])
    }
}

// ── fixtures ──────────────────────────────────────────────────────────────────

fn model(style: &str) -> ProjectModel {
    ProjectModel::from_json(&format!(
        r#"{{
            "package": "com.example.shop",
            "name": "shop",
            "entities": [{{
                "name": "Customer",
                "fields": {{
                    "id": {{ "type": "Long", "pk": true, "generated": "identity" }},
                    "email": {{ "type": "String", "length": 120 }}
                }},
                "finders": {{
                    "Email": {{
                        "query": "SELECT c FROM Customer c WHERE c.email = :email",
                        "unique": true,
                        "params": {{ "email": "String" }}
                    }}
                }}
            }}],
            "datasource": {{
                "database": "postgresql",
                "url": "jdbc:postgresql://localhost:5432/shop",
                "user": "shop", "password": "secret",
                "style": "{style}"
            }}
        }}"#
    ))
    .unwrap()
}

fn api() -> ApiModel {
    ApiModel::from_json(
        r#"{
            "paths": {
                "/api/users": {
                    "get": { "operationId": "listUsers", "response": "User[]" }
                },
                "/api/users/{id}": {
                    "get": {
                        "operationId": "getUser",
                        "parameters": [ { "name": "id", "in": "path", "type": "Long" } ],
                        "response": "User"
                    }
                },
                "/api/orders": {
                    "post": { "operationId": "createOrder", "body": "OrderRequest" }
                }
            },
            "schemas": {
                "User": { "id": "Long", "name": "String" },
                "OrderRequest": { "total": "BigDecimal" }
            }
        }"#,
    )
    .unwrap()
}

fn harness(resolver: Box<dyn DependencyResolver>) -> (GenerationService, MemFs, MemDescriptors) {
    let fs = MemFs::default();
    let descriptors = MemDescriptors::default();
    let service = GenerationService::new(
        Box::new(fs.clone()),
        Box::new(descriptors.clone()),
        resolver,
        Box::new(StubFeatures),
    );
    (service, fs, descriptors)
}

fn run(service: &GenerationService, model: &ProjectModel, api: Option<&ApiModel>) {
    let report = service
        .run(model, api, None, Path::new("/app"), &GenerateOptions::default())
        .unwrap();
    assert!(
        report.is_clean(),
        "run had failed phases: {:?}",
        report.failed_phases().collect::<Vec<_>>()
    );
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[test]
fn full_run_emits_sources_and_descriptors() {
    let (service, fs, descriptors) = harness(Box::new(StubResolver));
    run(&service, &model("WEB"), None);

    let entity = fs
        .read("/app/src/main/java/com/example/shop/entity/Customer.java")
        .expect("entity class written");
    assert!(entity.contains("@Entity"));
    assert!(entity.contains("@NamedQuery(name = \"Customer.findByEmail\""));

    let repository = fs
        .read("/app/src/main/java/com/example/shop/repository/CustomerRepository.java")
        .expect("repository class written");
    assert!(repository.contains("public Customer find(Long id)"));
    assert!(repository.contains("getSingleResult()"));

    assert!(
        fs.read("/app/src/main/java/com/example/shop/service/CustomerService.java")
            .is_some()
    );

    let persistence = descriptors
        .tree("/app/src/main/resources/META-INF/persistence.xml")
        .expect("persistence descriptor written");
    assert_eq!(
        persistence.child("persistence-unit").unwrap().attr("name"),
        Some("shopPU")
    );
}

#[test]
fn web_style_targets_only_the_web_descriptor() {
    let (service, fs, descriptors) = harness(Box::new(StubResolver));
    run(&service, &model("WEB"), None);

    let web = descriptors
        .tree("/app/src/main/webapp/WEB-INF/web.xml")
        .expect("web descriptor written");
    let ds = web.child("data-source").expect("datasource element");
    assert_eq!(
        ds.child_text("class-name"),
        Some("org.postgresql.ds.PGSimpleDataSource")
    );

    // Provisioning exclusivity: no Payara or Liberty artifacts.
    assert!(
        descriptors
            .tree("/app/src/main/webapp/WEB-INF/payara-resources.xml")
            .is_none()
    );
    assert!(
        descriptors
            .tree("/app/src/main/liberty/config/server.xml")
            .is_none()
    );
    assert!(fs.read("/app/post-boot-commands.txt").is_none());
}

#[test]
fn repeated_runs_do_not_duplicate_descriptor_nodes() {
    let (service, _fs, descriptors) = harness(Box::new(StubResolver));
    let model = model("WEB");
    run(&service, &model, None);
    run(&service, &model, None);

    let web = descriptors
        .tree("/app/src/main/webapp/WEB-INF/web.xml")
        .unwrap();
    assert_eq!(web.children_named("data-source").count(), 1);

    let pom = descriptors.tree("/app/pom.xml").unwrap();
    assert_eq!(pom.locate(&["dependencies", "dependency"]).len(), 1);
    let war_plugins = pom
        .locate(&["build", "plugins", "plugin"])
        .into_iter()
        .filter(|p| p.child_text("artifactId") == Some("maven-war-plugin"))
        .count();
    assert_eq!(war_plugins, 1);
}

#[test]
fn payara_style_creates_named_pool_and_leaves_web_descriptor_untouched() {
    let (service, _fs, descriptors) = harness(Box::new(StubResolver));
    run(&service, &model("PAYARA_RESOURCES"), None);

    let resources = descriptors
        .tree("/app/src/main/webapp/WEB-INF/payara-resources.xml")
        .expect("resources descriptor written");
    let pool = resources
        .child("jdbc-connection-pool")
        .expect("connection pool");
    assert_eq!(pool.attr("name"), Some("shopPool"));
    let resource = resources.child("jdbc-resource").expect("resource binding");
    assert_eq!(resource.attr("pool-name"), Some("shopPool"));

    assert!(
        descriptors
            .tree("/app/src/main/webapp/WEB-INF/web.xml")
            .is_none()
    );
}

#[test]
fn payara_micro_variant_writes_post_boot_script() {
    let (service, fs, descriptors) = harness(Box::new(StubResolver));
    let report = service
        .run(
            &model("PAYARA_RESOURCES"),
            None,
            None,
            Path::new("/app"),
            &GenerateOptions { payara_micro: true },
        )
        .unwrap();
    assert!(report.is_clean());

    let script = fs
        .read("/app/post-boot-commands.txt")
        .expect("post-boot script written");
    assert!(script.contains("create-jdbc-connection-pool"));
    assert!(script.contains("url=jdbc\\:postgresql\\://localhost\\:5432/shop"));
    assert!(script.contains("create-jdbc-resource --connectionpoolid shopPool jdbc/postgresql"));

    // Micro variant replaces the static resources descriptor.
    assert!(
        descriptors
            .tree("/app/src/main/webapp/WEB-INF/payara-resources.xml")
            .is_none()
    );
}

#[test]
fn liberty_style_populates_server_descriptor_and_profile_plugin() {
    let (service, _fs, descriptors) = harness(Box::new(StubResolver));
    run(&service, &model("OPENLIBERTY"), None);

    let server = descriptors
        .tree("/app/src/main/liberty/config/server.xml")
        .expect("server descriptor written");
    let features: Vec<_> = server
        .child("featureManager")
        .unwrap()
        .children_named("feature")
        .filter_map(|f| f.text.as_deref())
        .collect();
    assert_eq!(features, ["jakartaee-10.0", "microProfile-6.1"]);
    assert!(server.child("library").is_some());
    assert!(server.child("dataSource").is_some());

    let pom = descriptors.tree("/app/pom.xml").unwrap();
    let plugins = pom.locate(&["profiles", "profile", "build", "plugins", "plugin"]);
    assert!(
        plugins
            .iter()
            .any(|p| p.child_text("artifactId") == Some("liberty-maven-plugin"))
    );
}

#[test]
fn resolver_failure_skips_only_the_datasource_branch() {
    let (service, fs, descriptors) = harness(Box::new(FailingResolver));
    let report = service
        .run(
            &model("WEB"),
            None,
            None,
            Path::new("/app"),
            &GenerateOptions::default(),
        )
        .unwrap();

    assert!(!report.is_clean());
    let failed: Vec<_> = report.failed_phases().map(|p| p.phase).collect();
    assert_eq!(failed, ["datasource"]);

    // Independent branches still completed.
    assert!(
        fs.read("/app/src/main/java/com/example/shop/entity/Customer.java")
            .is_some()
    );
    assert!(
        descriptors
            .tree("/app/src/main/resources/META-INF/persistence.xml")
            .is_some()
    );
    // The datasource-dependent artifact was not written.
    assert!(
        descriptors
            .tree("/app/src/main/webapp/WEB-INF/web.xml")
            .is_none()
    );
}

#[test]
fn unsupported_style_is_an_isolated_phase_failure() {
    let (service, fs, _descriptors) = harness(Box::new(StubResolver));
    let report = service
        .run(
            &model("WILDFLY"),
            None,
            None,
            Path::new("/app"),
            &GenerateOptions::default(),
        )
        .unwrap();
    let failed: Vec<_> = report.failed_phases().map(|p| p.phase).collect();
    assert_eq!(failed, ["datasource"]);
    assert!(
        fs.read("/app/src/main/java/com/example/shop/entity/Customer.java")
            .is_some()
    );
}

#[test]
fn rest_resources_split_by_shared_root_prefix() {
    let (service, fs, _descriptors) = harness(Box::new(StubResolver));
    run(&service, &model("WEB"), Some(&api()));

    let users = fs
        .read("/app/src/main/java/com/example/shop/rest/UsersResource.java")
        .expect("users resource written");
    assert!(users.contains("@Path(\"/api/users\")"));
    assert!(users.contains("public List<User> listUsers()"));
    assert!(users.contains("@PathParam(\"id\") Long id"));

    let orders = fs
        .read("/app/src/main/java/com/example/shop/rest/OrdersResource.java")
        .expect("orders resource written");
    assert!(orders.contains("public void createOrder(OrderRequest body)"));

    assert!(
        fs.read("/app/src/main/java/com/example/shop/rest/User.java")
            .is_some()
    );
}

#[test]
fn rerun_deduplicates_resource_methods_by_operation_id() {
    let (service, fs, _descriptors) = harness(Box::new(StubResolver));
    let model = model("WEB");
    let api = api();
    run(&service, &model, Some(&api));
    let first = fs
        .read("/app/src/main/java/com/example/shop/rest/UsersResource.java")
        .unwrap();

    run(&service, &model, Some(&api));
    let second = fs
        .read("/app/src/main/java/com/example/shop/rest/UsersResource.java")
        .unwrap();

    assert_eq!(second.matches("// operation: listUsers").count(), 1);
    assert_eq!(second.matches("// operation: getUser").count(), 1);
    assert_eq!(first, second);
}

#[test]
fn rerun_with_new_operations_extends_the_import_block() {
    let (service, fs, _descriptors) = harness(Box::new(StubResolver));
    let model = model("WEB");

    // First pass: only the single-item path, so the resource class has no
    // collection-typed method and no java.util imports.
    let initial = ApiModel::from_json(
        r#"{
            "paths": {
                "/api/users/{id}": {
                    "get": {
                        "operationId": "getUser",
                        "parameters": [ { "name": "id", "in": "path", "type": "Long" } ],
                        "response": "User"
                    }
                },
                "/api/orders": {
                    "post": { "operationId": "createOrder", "body": "OrderRequest" }
                }
            },
            "schemas": {
                "User": { "id": "Long", "name": "String" },
                "OrderRequest": { "total": "BigDecimal" }
            }
        }"#,
    )
    .unwrap();
    run(&service, &model, Some(&initial));
    let first = fs
        .read("/app/src/main/java/com/example/shop/rest/UsersResource.java")
        .unwrap();
    assert!(!first.contains("import java.util.List;"));

    // Second pass adds /api/users (listUsers, User[]); the merged class
    // must import what the appended method references.
    run(&service, &model, Some(&api()));
    let merged = fs
        .read("/app/src/main/java/com/example/shop/rest/UsersResource.java")
        .unwrap();
    assert!(merged.contains("return Collections.emptyList();"));
    assert!(merged.contains("import java.util.Collections;"));
    assert!(merged.contains("import java.util.List;"));
    assert_eq!(merged.matches("// operation: getUser").count(), 1);
}

#[test]
fn view_model_produces_forms_and_holders() {
    let view = ViewModel::from_json(
        r#"{
            "forms": {
                "customerForm": [
                    { "name": "email", "type": "text", "validate": ["required", "email"] }
                ]
            },
            "views": {
                "/customers": { "type": "list", "form": "customerForm" }
            }
        }"#,
    )
    .unwrap();

    let (service, fs, _descriptors) = harness(Box::new(StubResolver));
    let report = service
        .run(
            &model("WEB"),
            None,
            Some(&view),
            Path::new("/app"),
            &GenerateOptions::default(),
        )
        .unwrap();
    assert!(report.is_clean());

    let form = fs
        .read("/app/src/main/java/com/example/shop/view/CustomerForm.java")
        .expect("form bean written");
    assert!(form.contains("@NotNull"));

    let holder = fs
        .read("/app/src/main/java/com/example/shop/view/CustomersView.java")
        .expect("view holder written");
    assert!(holder.contains("@SessionScoped"));
    assert!(holder.contains("List<CustomerForm>"));
}

#[test]
fn invalid_model_is_fatal() {
    let mut bad = model("WEB");
    bad.entities.push(bad.entities[0].clone());
    let (service, _fs, _descriptors) = harness(Box::new(StubResolver));
    assert!(
        service
            .run(&bad, None, None, Path::new("/app"), &GenerateOptions::default())
            .is_err()
    );
}
