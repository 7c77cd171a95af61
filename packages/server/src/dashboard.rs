//! Per-request dashboard pipeline.
//!
//! Fetch, derive, filter, aggregate, and (for the HTML page) render the
//! map. Nothing here outlives the request.

use crime_dashboard_analytics::aggregate::{
    TOP_CATEGORY_LIMIT, distinct_categories, distinct_wards, time_breakdown, top_categories,
};
use crime_dashboard_analytics::features::derive_features;
use crime_dashboard_analytics::{AnalyticsError, filter};
use crime_dashboard_analytics_models::{CategoryCount, FilterCriteria, TimeBreakdown};
use crime_dashboard_incident_models::DerivedIncident;
use crime_dashboard_map::{
    BoundaryOverlay, MapError, MapMarker, RenderedMap, render_map, valid_coordinates,
};
use crime_dashboard_server_models::{ApiSummary, DashboardQueryParams};
use crime_dashboard_source::{CrimeSource, fetch_boundaries_or_none, fetch_incidents_or_empty};
use crime_dashboard_source_models::SourceDefinition;
use thiserror::Error;

/// Body returned when the upstream dataset yields nothing.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch crime data.";

/// Errors that stop the dashboard from rendering.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The fetch failed or returned no rows.
    #[error("Failed to fetch crime data.")]
    NoData,

    /// A record could not be processed.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// The map could not be rendered.
    #[error(transparent)]
    Map(#[from] MapError),
}

/// Fetches the incident table and derives time features.
///
/// # Errors
///
/// Returns [`DashboardError::NoData`] when the fetch fails or is empty and
/// [`DashboardError::Analytics`] when a record has a bad timestamp.
pub async fn load_incidents(
    source: &dyn CrimeSource,
) -> Result<Vec<DerivedIncident>, DashboardError> {
    let raw = fetch_incidents_or_empty(source).await;
    if raw.is_empty() {
        return Err(DashboardError::NoData);
    }
    log::info!("Fetched {} incidents from {}", raw.len(), source.id());

    Ok(derive_features(raw)?)
}

/// Validates query parameters into filter criteria.
#[must_use]
pub fn criteria_from(params: &DashboardQueryParams) -> FilterCriteria {
    filter::criteria(
        params.primary_type.as_deref(),
        params.ward.as_deref(),
        params.date_from.as_deref(),
        params.date_to.as_deref(),
    )
}

/// Everything the page and the JSON summary show for one request.
#[derive(Debug)]
pub struct DashboardView<'a> {
    /// Size of the fetched table.
    pub total_count: usize,
    /// Records passing the filters, in fetch order.
    pub filtered: Vec<&'a DerivedIncident>,
    /// Markers for filtered records with usable coordinates.
    pub markers: Vec<MapMarker>,
    /// Most frequent categories among `filtered`.
    pub top_categories: Vec<CategoryCount>,
    /// Every category in the fetched table, sorted.
    pub categories: Vec<String>,
    /// Every ward in the fetched table.
    pub wards: Vec<String>,
    /// Hour and weekday distribution of `filtered`.
    pub time_breakdown: TimeBreakdown,
}

impl<'a> DashboardView<'a> {
    /// Filters and aggregates `records`.
    #[must_use]
    pub fn build(records: &'a [DerivedIncident], criteria: &FilterCriteria) -> Self {
        let filtered = filter::apply(records, criteria);
        let markers = valid_coordinates(&filtered);

        Self {
            total_count: records.len(),
            top_categories: top_categories(&filtered, TOP_CATEGORY_LIMIT),
            categories: distinct_categories(records),
            wards: distinct_wards(records),
            time_breakdown: time_breakdown(&filtered),
            markers,
            filtered,
        }
    }

    /// The JSON form of this view.
    #[must_use]
    pub fn summary(&self, source: &str) -> ApiSummary {
        ApiSummary {
            source: source.to_string(),
            total_count: self.total_count,
            filtered_count: self.filtered.len(),
            valid_coordinate_count: self.markers.len(),
            top_categories: self.top_categories.clone(),
            categories: self.categories.clone(),
            wards: self.wards.clone(),
            time_breakdown: self.time_breakdown.clone(),
        }
    }
}

/// Renders the map for `markers`, fetching the boundary overlay only when
/// there is something to draw it under.
///
/// # Errors
///
/// Returns [`DashboardError::Map`] if the map descriptor cannot be
/// serialized. Overlay fetch failures are logged and the overlay omitted.
pub async fn render_dashboard_map(
    source: &dyn CrimeSource,
    definition: &SourceDefinition,
    markers: &[MapMarker],
) -> Result<RenderedMap, DashboardError> {
    if markers.is_empty() {
        return Ok(RenderedMap::Placeholder);
    }

    let overlay = match &definition.boundaries {
        Some(config) => {
            fetch_boundaries_or_none(source)
                .await
                .map(|features| BoundaryOverlay {
                    features,
                    label: config.label.clone(),
                    style: config.style.clone(),
                })
        }
        None => None,
    };

    Ok(render_map(markers, overlay.as_ref(), &definition.map)?)
}
