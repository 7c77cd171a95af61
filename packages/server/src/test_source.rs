//! In-memory [`CrimeSource`] for handler and pipeline tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use crime_dashboard_incident_models::RawIncident;
use crime_dashboard_source::registry::{DEFAULT_SOURCE_ID, find_source};
use crime_dashboard_source::{CrimeSource, SourceError};
use geojson::FeatureCollection;

use crate::AppState;

pub enum Boundaries {
    None,
    Failing,
    Collection(FeatureCollection),
}

pub struct StaticSource {
    pub incidents: Option<Vec<RawIncident>>,
    pub boundaries: Boundaries,
    pub boundary_fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new(incidents: Vec<RawIncident>) -> Self {
        Self {
            incidents: Some(incidents),
            boundaries: Boundaries::None,
            boundary_fetches: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            incidents: None,
            boundaries: Boundaries::Failing,
            boundary_fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_boundaries(mut self, boundaries: Boundaries) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn boundary_fetches(&self) -> usize {
        self.boundary_fetches.load(Ordering::SeqCst)
    }
}

fn offline() -> SourceError {
    SourceError::Registry {
        message: "offline".to_string(),
    }
}

#[async_trait]
impl CrimeSource for StaticSource {
    fn id(&self) -> &'static str {
        "static"
    }

    fn name(&self) -> &'static str {
        "Static test source"
    }

    async fn fetch_incidents(&self) -> Result<Vec<RawIncident>, SourceError> {
        self.incidents.clone().ok_or_else(offline)
    }

    async fn fetch_boundaries(&self) -> Result<Option<FeatureCollection>, SourceError> {
        self.boundary_fetches.fetch_add(1, Ordering::SeqCst);
        match &self.boundaries {
            Boundaries::None => Ok(None),
            Boundaries::Failing => Err(offline()),
            Boundaries::Collection(collection) => Ok(Some(collection.clone())),
        }
    }
}

pub fn incident(
    id: &str,
    category: &str,
    ward: &str,
    date: &str,
    coordinates: Option<(f64, f64)>,
) -> RawIncident {
    RawIncident {
        id: Some(id.to_string()),
        date_of_occurrence: Some(date.to_string()),
        primary_description: Some(category.to_string()),
        ward: Some(ward.to_string()),
        latitude: coordinates.map(|(lat, _)| lat),
        longitude: coordinates.map(|(_, lon)| lon),
    }
}

/// Three ward-5 incidents (two THEFT, one BATTERY) and one ward-12 incident
/// without coordinates.
pub fn sample_incidents() -> Vec<RawIncident> {
    vec![
        incident("JA100", "THEFT", "5", "2024-01-01T00:00:00.000", Some((41.78, -87.58))),
        incident("JA101", "BATTERY", "5", "2024-01-01T18:30:00.000", Some((41.79, -87.59))),
        incident("JA102", "THEFT", "5", "2024-01-02T09:15:00.000", Some((41.77, -87.57))),
        incident("JA103", "ASSAULT", "12", "2024-01-03T21:00:00.000", None),
    ]
}

pub fn state_with(source: Arc<StaticSource>, max_table_rows: usize) -> AppState {
    AppState {
        source,
        definition: find_source(DEFAULT_SOURCE_ID).unwrap(),
        max_table_rows,
    }
}
