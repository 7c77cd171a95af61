#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory analytics over a fetched incident table.
//!
//! The pipeline runs once per request: [`features::derive_features`]
//! parses timestamps and attaches time features, [`filter::criteria`]
//! validates the raw query parameters, [`filter::apply`] narrows the
//! table, and the [`aggregate`] functions summarize the result.

pub mod aggregate;
pub mod features;
pub mod filter;

use crime_dashboard_incident_models::IncidentError;
use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A record could not be converted into a typed incident.
    #[error("Incident error: {0}")]
    Incident(#[from] IncidentError),
}
