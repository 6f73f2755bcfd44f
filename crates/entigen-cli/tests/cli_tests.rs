//! Integration tests for entigen-cli.
//!
//! Generation tests run with `--offline` so no test ever touches the
//! network; the offline resolver uses pinned driver versions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn entigen() -> Command {
    Command::cargo_bin("entigen").unwrap()
}

const MODEL: &str = r#"{
    "package": "com.example.shop",
    "name": "shop",
    "entities": [{
        "name": "Customer",
        "fields": {
            "id": { "type": "Long", "pk": true, "generated": "identity" },
            "email": { "type": "String", "length": 120 }
        }
    }],
    "datasource": {
        "database": "h2",
        "url": "jdbc:h2:mem:shop",
        "user": "sa", "password": "",
        "style": "WEB"
    }
}"#;

fn write_model(temp: &TempDir, content: &str) -> std::path::PathBuf {
    let path = temp.path().join("model.json");
    fs::write(&path, content).unwrap();
    path
}

// ── argument surface ──────────────────────────────────────────────────────────

#[test]
fn help_flag_succeeds() {
    entigen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn version_flag_prints_crate_version() {
    entigen()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_arguments_is_a_usage_error() {
    entigen().assert().failure().code(2);
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    entigen().arg("deploy").assert().failure().code(2);
}

#[test]
fn completions_emit_a_bash_script() {
    entigen()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("entigen"));
}

// ── validate ──────────────────────────────────────────────────────────────────

#[test]
fn validate_accepts_a_well_formed_model() {
    let temp = TempDir::new().unwrap();
    let model = write_model(&temp, MODEL);

    entigen()
        .args(["validate", "--model"])
        .arg(&model)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn validate_rejects_malformed_json() {
    let temp = TempDir::new().unwrap();
    let model = write_model(&temp, "{ not json");

    entigen()
        .args(["validate", "--model"])
        .arg(&model)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("parsed"));
}

#[test]
fn validate_rejects_two_primary_keys() {
    let temp = TempDir::new().unwrap();
    let model = write_model(
        &temp,
        r#"{
            "package": "com.example", "name": "shop",
            "entities": [{
                "name": "Customer",
                "fields": {
                    "id": { "type": "Long", "pk": true },
                    "email": { "type": "String", "pk": true }
                }
            }],
            "datasource": {
                "database": "h2", "url": "jdbc:h2:mem:x",
                "user": "sa", "password": "", "style": "WEB"
            }
        }"#,
    );

    entigen()
        .args(["validate", "--model"])
        .arg(&model)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("primary-key"));
}

#[test]
fn missing_model_file_exits_not_found() {
    entigen()
        .args(["validate", "--model", "/nonexistent/model.json"])
        .assert()
        .failure()
        .code(3);
}

// ── generate ──────────────────────────────────────────────────────────────────

#[test]
fn offline_generation_writes_sources_and_descriptors() {
    let temp = TempDir::new().unwrap();
    let model = write_model(&temp, MODEL);
    let project = temp.path().join("app");

    entigen()
        .args(["generate", "--offline", "--model"])
        .arg(&model)
        .arg("--project-dir")
        .arg(&project)
        .assert()
        .success();

    assert!(
        project
            .join("src/main/java/com/example/shop/entity/Customer.java")
            .exists()
    );
    assert!(
        project
            .join("src/main/java/com/example/shop/repository/CustomerRepository.java")
            .exists()
    );
    assert!(project.join("src/main/resources/META-INF/persistence.xml").exists());
    assert!(project.join("src/main/webapp/WEB-INF/web.xml").exists());

    let pom = fs::read_to_string(project.join("pom.xml")).unwrap();
    assert!(pom.contains("<artifactId>h2</artifactId>"));
    assert!(pom.contains("<packaging>war</packaging>"));
}

#[test]
fn generation_is_idempotent_across_runs() {
    let temp = TempDir::new().unwrap();
    let model = write_model(&temp, MODEL);
    let project = temp.path().join("app");

    for _ in 0..2 {
        entigen()
            .args(["generate", "--offline", "--model"])
            .arg(&model)
            .arg("--project-dir")
            .arg(&project)
            .assert()
            .success();
    }

    let web = fs::read_to_string(project.join("src/main/webapp/WEB-INF/web.xml")).unwrap();
    assert_eq!(web.matches("<data-source>").count(), 1);

    let pom = fs::read_to_string(project.join("pom.xml")).unwrap();
    assert_eq!(pom.matches("<artifactId>h2</artifactId>").count(), 1);
}

#[test]
fn unknown_style_only_fails_strict_runs() {
    let temp = TempDir::new().unwrap();
    let model = write_model(&temp, &MODEL.replace("WEB", "WILDFLY"));
    let project = temp.path().join("app");

    // Lenient run: provisioning fails, the rest is still written, exit 0.
    entigen()
        .args(["generate", "--offline", "--model"])
        .arg(&model)
        .arg("--project-dir")
        .arg(&project)
        .assert()
        .success();
    assert!(
        project
            .join("src/main/java/com/example/shop/entity/Customer.java")
            .exists()
    );
    assert!(!project.join("src/main/webapp/WEB-INF/web.xml").exists());

    // Strict run fails.
    entigen()
        .args(["generate", "--offline", "--strict", "--model"])
        .arg(&model)
        .arg("--project-dir")
        .arg(&project)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("datasource"));
}
