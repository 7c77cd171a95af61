#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Request and response types for the crime dashboard server.
//!
//! Query parameters use the dashboard form's field names (`primary_type`,
//! `ward`, `date_from`, `date_to`) so the HTML form and the JSON API
//! accept the same query string.

use crime_dashboard_analytics_models::{CategoryCount, TimeBreakdown};
use serde::{Deserialize, Serialize};

/// Filter parameters accepted by `/` and `/api/summary`.
///
/// Values are raw; validation into filter criteria happens once in the
/// handler.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQueryParams {
    /// Crime category, or `"All"`.
    pub primary_type: Option<String>,
    /// Ward, or `"All"`.
    pub ward: Option<String>,
    /// Inclusive start date, `YYYY-MM-DD`.
    pub date_from: Option<String>,
    /// Inclusive end date, `YYYY-MM-DD`.
    pub date_to: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Dashboard aggregates as JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    /// Source the data was fetched from.
    pub source: String,
    /// Records fetched from upstream.
    pub total_count: usize,
    /// Records passing the filters.
    pub filtered_count: usize,
    /// Filtered records with usable coordinates.
    pub valid_coordinate_count: usize,
    /// Most frequent categories in the filtered set.
    pub top_categories: Vec<CategoryCount>,
    /// Every category in the fetched set.
    pub categories: Vec<String>,
    /// Every ward in the fetched set.
    pub wards: Vec<String>,
    /// Hour and weekday distribution of the filtered set.
    pub time_breakdown: TimeBreakdown,
}

/// Error body returned by the JSON API.
#[derive(Debug, Serialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}
