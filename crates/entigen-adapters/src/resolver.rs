//! Database driver coordinate resolution.
//!
//! The database token from the model maps to a known Maven coordinate and
//! datasource class. The online resolver then asks Maven Central for the
//! latest released version of that coordinate; the static resolver uses
//! pinned versions and never touches the network.

use serde::Deserialize;
use tracing::{debug, instrument};

use entigen_core::application::ApplicationError;
use entigen_core::application::ports::{DependencyResolver, DriverArtifact};
use entigen_core::domain::DomainError;
use entigen_core::error::EntigenResult;

/// Known driver coordinate for a database token.
struct KnownDriver {
    group_id: &'static str,
    artifact_id: &'static str,
    pinned_version: &'static str,
    driver_class: &'static str,
}

fn known_driver(database: &str) -> Result<&'static KnownDriver, DomainError> {
    static DRIVERS: &[(&str, KnownDriver)] = &[
        (
            "postgresql",
            KnownDriver {
                group_id: "org.postgresql",
                artifact_id: "postgresql",
                pinned_version: "42.7.3",
                driver_class: "org.postgresql.ds.PGSimpleDataSource",
            },
        ),
        (
            "mysql",
            KnownDriver {
                group_id: "com.mysql",
                artifact_id: "mysql-connector-j",
                pinned_version: "9.0.0",
                driver_class: "com.mysql.cj.jdbc.MysqlDataSource",
            },
        ),
        (
            "mariadb",
            KnownDriver {
                group_id: "org.mariadb.jdbc",
                artifact_id: "mariadb-java-client",
                pinned_version: "3.4.1",
                driver_class: "org.mariadb.jdbc.MariaDbDataSource",
            },
        ),
        (
            "h2",
            KnownDriver {
                group_id: "com.h2database",
                artifact_id: "h2",
                pinned_version: "2.3.232",
                driver_class: "org.h2.jdbcx.JdbcDataSource",
            },
        ),
        (
            "derby",
            KnownDriver {
                group_id: "org.apache.derby",
                artifact_id: "derbyclient",
                pinned_version: "10.17.1.0",
                driver_class: "org.apache.derby.jdbc.ClientDataSource",
            },
        ),
    ];

    DRIVERS
        .iter()
        .find(|(token, _)| token.eq_ignore_ascii_case(database))
        .map(|(_, driver)| driver)
        .ok_or_else(|| DomainError::UnknownDatabase {
            database: database.to_string(),
        })
}

// ── offline ───────────────────────────────────────────────────────────────────

/// Resolver with pinned driver versions, for offline runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticResolver;

impl StaticResolver {
    pub fn new() -> Self {
        Self
    }
}

impl DependencyResolver for StaticResolver {
    fn resolve(&self, database: &str) -> EntigenResult<DriverArtifact> {
        let driver = known_driver(database)?;
        Ok(DriverArtifact {
            group_id: driver.group_id.to_string(),
            artifact_id: driver.artifact_id.to_string(),
            version: driver.pinned_version.to_string(),
            driver_class: driver.driver_class.to_string(),
        })
    }
}

// ── online ────────────────────────────────────────────────────────────────────

const SEARCH_URL: &str = "https://search.maven.org/solrsearch/select";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    #[serde(rename = "latestVersion")]
    latest_version: String,
}

/// Resolver that asks the Maven Central search API for the latest released
/// version of the known coordinate.
pub struct MavenCentralResolver {
    client: reqwest::blocking::Client,
    search_url: String,
}

impl MavenCentralResolver {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            search_url: SEARCH_URL.to_string(),
        }
    }

    /// Point the resolver at a different search endpoint, for tests.
    pub fn with_search_url(search_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            search_url: search_url.into(),
        }
    }

    fn latest_version(&self, group: &str, artifact: &str) -> Result<String, String> {
        let query = format!("g:\"{group}\" AND a:\"{artifact}\"");
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query.as_str()), ("rows", "1"), ("wt", "json")])
            .send()
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;
        let body: SearchResponse = response.json().map_err(|e| e.to_string())?;
        body.response
            .docs
            .into_iter()
            .next()
            .map(|doc| doc.latest_version)
            .ok_or_else(|| format!("no artifact found for {group}:{artifact}"))
    }
}

impl Default for MavenCentralResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl DependencyResolver for MavenCentralResolver {
    #[instrument(skip(self))]
    fn resolve(&self, database: &str) -> EntigenResult<DriverArtifact> {
        let driver = known_driver(database)?;
        let version = self
            .latest_version(driver.group_id, driver.artifact_id)
            .map_err(|reason| ApplicationError::ResolutionFailed {
                database: database.to_string(),
                reason,
            })?;
        debug!(
            coordinate = format!("{}:{}", driver.group_id, driver.artifact_id),
            version, "driver coordinate resolved"
        );
        Ok(DriverArtifact {
            group_id: driver.group_id.to_string(),
            artifact_id: driver.artifact_id.to_string(),
            version,
            driver_class: driver.driver_class.to_string(),
        })
    }
}
