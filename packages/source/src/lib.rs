#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime dataset and boundary overlay fetchers.
//!
//! Each dashboard source implements the [`CrimeSource`] trait. Fetch
//! failures never reach the page: [`fetch_incidents_or_empty`] and
//! [`fetch_boundaries_or_none`] log them and degrade to an empty table or
//! a missing overlay.

pub mod boundaries;
pub mod registry;
pub mod socrata;
pub mod source_def;

#[cfg(test)]
mod test_server;

use async_trait::async_trait;
use crime_dashboard_incident_models::RawIncident;
use geojson::FeatureCollection;

/// Errors that can occur while fetching from a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Status code received.
        status: reqwest::StatusCode,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// `GeoJSON` parsing failed.
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// An embedded source definition is malformed or missing.
    #[error("Source registry error: {message}")]
    Registry {
        /// Description of what went wrong.
        message: String,
    },
}

/// A provider of incident records and, optionally, boundary polygons.
#[async_trait]
pub trait CrimeSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"chicago"`).
    fn id(&self) -> &str;

    /// Returns the human-readable name of this source.
    fn name(&self) -> &str;

    /// Downloads the incident table.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails, the server answers
    /// with a non-success status, or the body is not a JSON array.
    async fn fetch_incidents(&self) -> Result<Vec<RawIncident>, SourceError>;

    /// Downloads the boundary overlay. `Ok(None)` means the source has no
    /// overlay configured.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or the body is not a
    /// `GeoJSON` `FeatureCollection`.
    async fn fetch_boundaries(&self) -> Result<Option<FeatureCollection>, SourceError>;
}

/// Fetches the incident table, logging any failure and returning an empty
/// table in its place.
pub async fn fetch_incidents_or_empty(source: &dyn CrimeSource) -> Vec<RawIncident> {
    match source.fetch_incidents().await {
        Ok(records) => records,
        Err(e) => {
            log::error!("Error getting data from {}: {e}", source.id());
            Vec::new()
        }
    }
}

/// Fetches the boundary overlay, logging any failure and returning `None`
/// in its place.
pub async fn fetch_boundaries_or_none(source: &dyn CrimeSource) -> Option<FeatureCollection> {
    match source.fetch_boundaries().await {
        Ok(overlay) => overlay,
        Err(e) => {
            log::warn!("Omitting boundary overlay for {}: {e}", source.id());
            None
        }
    }
}
