//! Runtime feature lookup for the Liberty provisioning branch.

use serde::Deserialize;
use tracing::debug;

use entigen_core::application::ApplicationError;
use entigen_core::application::ports::FeatureSource;
use entigen_core::error::EntigenResult;

/// Built-in feature set, used offline and as the remote fallback.
pub const DEFAULT_FEATURES: &[&str] = &["jakartaee-10.0", "microProfile-6.1"];

/// Feature source with a fixed list.
#[derive(Debug, Clone)]
pub struct StaticFeatureSource {
    features: Vec<String>,
}

impl StaticFeatureSource {
    pub fn new(features: Vec<String>) -> Self {
        Self { features }
    }
}

impl Default for StaticFeatureSource {
    fn default() -> Self {
        Self::new(DEFAULT_FEATURES.iter().map(|f| f.to_string()).collect())
    }
}

impl FeatureSource for StaticFeatureSource {
    fn features(&self) -> EntigenResult<Vec<String>> {
        Ok(self.features.clone())
    }
}

#[derive(Debug, Deserialize)]
struct FeatureDocument {
    features: Vec<String>,
}

/// Feature source backed by a hosted JSON document of the shape
/// `{ "features": ["jakartaee-10.0", ...] }`.
pub struct RemoteFeatureSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl RemoteFeatureSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            url: url.into(),
        }
    }
}

impl FeatureSource for RemoteFeatureSource {
    fn features(&self) -> EntigenResult<Vec<String>> {
        let fetch = || -> Result<Vec<String>, String> {
            let response = self
                .client
                .get(&self.url)
                .send()
                .map_err(|e| e.to_string())?
                .error_for_status()
                .map_err(|e| e.to_string())?;
            let document: FeatureDocument = response.json().map_err(|e| e.to_string())?;
            Ok(document.features)
        };
        let features = fetch().map_err(|reason| ApplicationError::FeatureLookupFailed { reason })?;
        debug!(count = features.len(), url = %self.url, "feature list fetched");
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_static_source_serves_builtin_features() {
        let features = StaticFeatureSource::default().features().unwrap();
        assert_eq!(features, DEFAULT_FEATURES);
    }

    #[test]
    fn feature_document_parses() {
        let document: FeatureDocument =
            serde_json::from_str(r#"{ "features": ["jakartaee-10.0"] }"#).unwrap();
        assert_eq!(document.features, ["jakartaee-10.0"]);
    }
}
