//! Datasource provisioning strategies.
//!
//! A state machine with three terminal branches, selected once per run by
//! the model's provisioning style and never re-evaluated mid-run. Each
//! branch writes its own descriptor through the merge-aware tree and adds
//! the resolved database driver (plus the packaging/runtime plugins that
//! style needs) to the shared build descriptor.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::application::GenerationContext;
use crate::application::emitters::pom;
use crate::application::ports::{DescriptorStore, DriverArtifact, FeatureSource, Filesystem};
use crate::domain::{Element, Identity, ProjectModel, ProvisioningStyle};
use crate::error::EntigenResult;

/// Location of the web deployment descriptor.
pub fn web_descriptor_path(base: &Path) -> PathBuf {
    base.join("src/main/webapp/WEB-INF/web.xml")
}

/// Location of the Liberty runtime server descriptor.
pub fn server_descriptor_path(base: &Path) -> PathBuf {
    base.join("src/main/liberty/config/server.xml")
}

/// Location of the Payara static resources descriptor.
pub fn resources_descriptor_path(base: &Path) -> PathBuf {
    base.join("src/main/webapp/WEB-INF/payara-resources.xml")
}

/// Location of the Payara Micro post-boot command script.
pub fn post_boot_path(base: &Path) -> PathBuf {
    base.join("post-boot-commands.txt")
}

/// Provision the datasource for the configured style.
///
/// The driver lookup goes through the run context's memoized resolver; a
/// failed lookup aborts this branch only - the caller isolates the error
/// so independent phases proceed.
#[instrument(skip_all, fields(style = %model.datasource.style))]
pub fn emit(
    fs: &dyn Filesystem,
    store: &dyn DescriptorStore,
    ctx: &GenerationContext<'_>,
    features: &dyn FeatureSource,
    model: &ProjectModel,
    base: &Path,
    build: &mut Element,
    payara_micro: bool,
) -> EntigenResult<()> {
    let style: ProvisioningStyle = model.datasource.style.parse()?;
    let driver = ctx.resolve(&model.datasource.database)?;
    info!(style = %style, driver = %driver.driver_class, "provisioning datasource");

    pom::ensure_driver_dependency(build, &driver);
    pom::ensure_war_plugin(build);

    match style {
        ProvisioningStyle::Web => emit_web(store, model, base, &driver),
        ProvisioningStyle::OpenLiberty => {
            emit_liberty(store, features, model, base, &driver, build)
        }
        ProvisioningStyle::PayaraResources => {
            if payara_micro {
                emit_payara_micro(fs, model, base, &driver, build)
            } else {
                emit_payara_resources(store, model, base, &driver)
            }
        }
    }
}

// ── WEB ───────────────────────────────────────────────────────────────────────

fn emit_web(
    store: &dyn DescriptorStore,
    model: &ProjectModel,
    base: &Path,
    driver: &DriverArtifact,
) -> EntigenResult<()> {
    let path = web_descriptor_path(base);
    let mut root = store.load(&path)?.unwrap_or_else(default_web_root);

    let ds = &model.datasource;
    let element = root.find_or_create("data-source", &Identity::ByName);
    element.ensure_child_text("name", format!("java:app/jdbc/{}", ds.database));
    element.ensure_child_text("class-name", driver.driver_class.clone());
    element.ensure_child_text("url", ds.url.clone());
    element.ensure_child_text("user", ds.user.clone());
    element.ensure_child_text("password", ds.password.clone());

    for (key, value) in &ds.properties {
        ensure_named_property(element, key, value);
    }

    store.save(&path, &root)?;
    debug!(path = %path.display(), "web descriptor updated");
    Ok(())
}

fn default_web_root() -> Element {
    let mut root = Element::new("web-app");
    root.set_attr("xmlns", "https://jakarta.ee/xml/ns/jakartaee");
    root.set_attr("version", "6.0");
    root
}

/// Web-descriptor properties nest name/value as child elements; the name
/// child's text is the identity key.
fn ensure_named_property(parent: &mut Element, key: &str, value: &str) {
    let position = parent
        .children
        .iter()
        .position(|c| c.name == "property" && c.child_text("name") == Some(key));
    let property = match position {
        Some(idx) => &mut parent.children[idx],
        None => {
            let property = parent.create_child("property");
            property.create_child_with_text("name", key);
            property
        }
    };
    property.ensure_child_text("value", value);
}

// ── OPENLIBERTY ───────────────────────────────────────────────────────────────

fn emit_liberty(
    store: &dyn DescriptorStore,
    features: &dyn FeatureSource,
    model: &ProjectModel,
    base: &Path,
    driver: &DriverArtifact,
    build: &mut Element,
) -> EntigenResult<()> {
    let path = server_descriptor_path(base);
    let mut root = store
        .load(&path)?
        .unwrap_or_else(|| Element::new("server"));

    // Features are copied verbatim from the remote configuration document.
    let manager = root.find_or_create("featureManager", &Identity::ByName);
    for feature in features.features()? {
        let present = manager
            .children_named("feature")
            .any(|f| f.text.as_deref() == Some(feature.as_str()));
        if !present {
            manager.create_child_with_text("feature", feature);
        }
    }

    let endpoint = root.find_or_create(
        "httpEndpoint",
        &Identity::by_attribute("id", "defaultHttpEndpoint"),
    );
    endpoint.set_attr("httpPort", "9080");
    endpoint.set_attr("httpsPort", "9443");

    let application = root.find_or_create("webApplication", &Identity::ByName);
    application.set_attr("location", format!("{}.war", model.name));
    application.set_attr("contextRoot", format!("/{}", model.name));

    let library = root.find_or_create("library", &Identity::by_attribute("id", "jdbcLib"));
    let fileset = library.find_or_create("fileset", &Identity::ByName);
    fileset.set_attr("dir", "${shared.resource.dir}");
    fileset.set_attr("includes", "*.jar");

    let ds = &model.datasource;
    let datasource = root.find_or_create(
        "dataSource",
        &Identity::by_attribute("id", "DefaultDataSource"),
    );
    datasource.set_attr("jndiName", format!("jdbc/{}", ds.database));
    datasource
        .find_or_create("jdbcDriver", &Identity::ByName)
        .set_attr("libraryRef", "jdbcLib");
    let properties = datasource.find_or_create("properties", &Identity::ByName);
    properties.set_attr("URL", ds.url.clone());
    properties.set_attr("user", ds.user.clone());
    properties.set_attr("password", ds.password.clone());

    store.save(&path, &root)?;
    debug!(path = %path.display(), "runtime server descriptor updated");

    // Runtime-server plugin with a dependency-copy block targeting the
    // resolved driver coordinate.
    let plugin = pom::ensure_profile_plugin(
        build,
        "openliberty",
        "io.openliberty.tools",
        "liberty-maven-plugin",
        "3.11.2",
    );
    let configuration = plugin.find_or_create("configuration", &Identity::ByName);
    let copy = configuration.find_or_create("copyDependencies", &Identity::ByName);
    let dependency = copy.find_or_create(
        "dependency",
        &Identity::by_coordinate(&driver.group_id, &driver.artifact_id),
    );
    dependency.ensure_child_text("version", driver.version.clone());
    Ok(())
}

// ── PAYARA_RESOURCES ──────────────────────────────────────────────────────────

fn pool_name(model: &ProjectModel) -> String {
    format!("{}Pool", model.name)
}

fn emit_payara_resources(
    store: &dyn DescriptorStore,
    model: &ProjectModel,
    base: &Path,
    driver: &DriverArtifact,
) -> EntigenResult<()> {
    let path = resources_descriptor_path(base);
    let mut root = store
        .load(&path)?
        .unwrap_or_else(|| Element::new("resources"));

    let ds = &model.datasource;
    let pool = pool_name(model);

    let connection_pool = root.find_or_create(
        "jdbc-connection-pool",
        &Identity::by_attribute("name", pool.clone()),
    );
    connection_pool.set_attr("datasource-classname", driver.driver_class.clone());
    connection_pool.set_attr("res-type", "javax.sql.DataSource");
    for (key, value) in [("url", ds.url.as_str()), ("user", ds.user.as_str()), ("password", ds.password.as_str())] {
        connection_pool
            .find_or_create("property", &Identity::by_attribute("name", key))
            .set_attr("value", value);
    }
    for (key, value) in &ds.properties {
        connection_pool
            .find_or_create("property", &Identity::by_attribute("name", key.clone()))
            .set_attr("value", value.clone());
    }

    let resource = root.find_or_create(
        "jdbc-resource",
        &Identity::by_attribute("jndi-name", format!("jdbc/{}", ds.database)),
    );
    resource.set_attr("pool-name", pool);

    store.save(&path, &root)?;
    debug!(path = %path.display(), "static resources descriptor updated");
    Ok(())
}

fn emit_payara_micro(
    fs: &dyn Filesystem,
    model: &ProjectModel,
    base: &Path,
    driver: &DriverArtifact,
    build: &mut Element,
) -> EntigenResult<()> {
    let path = post_boot_path(base);
    fs.write_file(&path, &post_boot_script(model, driver))?;
    debug!(path = %path.display(), "post-boot command script written");

    pom::ensure_profile_plugin(
        build,
        "payara-micro",
        "fish.payara.maven.plugins",
        "payara-micro-maven-plugin",
        "2.4",
    );
    Ok(())
}

/// The flat command script: one pool-creation line with colon-delimited
/// `key=value` pairs (literal colons in values escaped), then one
/// resource-binding line.
pub fn post_boot_script(model: &ProjectModel, driver: &DriverArtifact) -> String {
    let ds = &model.datasource;
    let pool = pool_name(model);

    let mut pairs = vec![
        format!("url={}", escape_colons(&ds.url)),
        format!("user={}", escape_colons(&ds.user)),
        format!("password={}", escape_colons(&ds.password)),
    ];
    for (key, value) in &ds.properties {
        pairs.push(format!("{key}={}", escape_colons(value)));
    }

    format!(
        "create-jdbc-connection-pool --datasourceclassname={} --restype=javax.sql.DataSource --property {} {}\n\
         create-jdbc-resource --connectionpoolid {} jdbc/{}\n",
        driver.driver_class,
        pairs.join(":"),
        pool,
        pool,
        ds.database,
    )
}

fn escape_colons(value: &str) -> String {
    value.replace(':', "\\:")
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn model(style: &str) -> ProjectModel {
        ProjectModel::from_json(&format!(
            r#"{{
                "package": "com.example.shop",
                "name": "shop",
                "datasource": {{
                    "database": "postgresql",
                    "url": "jdbc:postgresql://localhost:5432/shop",
                    "user": "shop", "password": "secret",
                    "style": "{style}",
                    "properties": {{ "ssl": "false" }}
                }}
            }}"#
        ))
        .unwrap()
    }

    fn driver() -> DriverArtifact {
        DriverArtifact {
            group_id: "org.postgresql".into(),
            artifact_id: "postgresql".into(),
            version: "42.7.3".into(),
            driver_class: "org.postgresql.ds.PGSimpleDataSource".into(),
        }
    }

    #[test]
    fn pool_name_uses_project_name() {
        assert_eq!(pool_name(&model("PAYARA_RESOURCES")), "shopPool");
    }

    #[test]
    fn post_boot_script_escapes_colons() {
        let script = post_boot_script(&model("PAYARA_RESOURCES"), &driver());
        let mut lines = script.lines();
        let pool_line = lines.next().unwrap();
        assert!(pool_line.starts_with("create-jdbc-connection-pool"));
        assert!(pool_line.contains("url=jdbc\\:postgresql\\://localhost\\:5432/shop"));
        assert!(pool_line.contains(":ssl=false"));
        assert!(pool_line.ends_with(" shopPool"));
        assert_eq!(
            lines.next().unwrap(),
            "create-jdbc-resource --connectionpoolid shopPool jdbc/postgresql"
        );
    }

    #[test]
    fn named_property_is_idempotent() {
        let mut element = Element::new("data-source");
        ensure_named_property(&mut element, "loginTimeout", "10");
        ensure_named_property(&mut element, "loginTimeout", "20");
        assert_eq!(element.children_named("property").count(), 1);
        assert_eq!(
            element.child("property").unwrap().child_text("value"),
            Some("20")
        );
    }
}
