//! Config-driven dashboard source.
//!
//! [`ConfiguredSource`] is the single [`CrimeSource`] implementation: it
//! reads the dataset endpoint, row limit and overlay URL from a
//! [`SourceDefinition`] and delegates to the Socrata and `GeoJSON`
//! fetchers.

use async_trait::async_trait;
use crime_dashboard_incident_models::RawIncident;
use crime_dashboard_source_models::SourceDefinition;
use geojson::FeatureCollection;

use crate::boundaries::fetch_feature_collection;
use crate::socrata::{SocrataConfig, fetch_socrata};
use crate::{CrimeSource, SourceError};

/// A [`CrimeSource`] backed by a TOML source definition.
pub struct ConfiguredSource {
    definition: SourceDefinition,
    client: reqwest::Client,
}

impl ConfiguredSource {
    /// Creates a source with a fresh HTTP client.
    #[must_use]
    pub fn new(definition: SourceDefinition) -> Self {
        Self {
            definition,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CrimeSource for ConfiguredSource {
    fn id(&self) -> &str {
        self.definition.id()
    }

    fn name(&self) -> &str {
        self.definition.name()
    }

    async fn fetch_incidents(&self) -> Result<Vec<RawIncident>, SourceError> {
        let config = SocrataConfig {
            api_url: &self.definition.dataset.api_url,
            row_limit: self.definition.dataset.row_limit,
            label: &self.definition.city,
        };
        fetch_socrata(&self.client, &config).await
    }

    async fn fetch_boundaries(&self) -> Result<Option<FeatureCollection>, SourceError> {
        let Some(boundaries) = &self.definition.boundaries else {
            return Ok(None);
        };
        fetch_feature_collection(&self.client, &boundaries.url)
            .await
            .map(Some)
    }
}

/// Parses a TOML string into a [`SourceDefinition`].
///
/// # Errors
///
/// Returns [`SourceError::Registry`] if the TOML is malformed or does not
/// match the schema.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Registry {
        message: e.to_string(),
    })
}
