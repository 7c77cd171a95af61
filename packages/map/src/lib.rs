#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Embeddable Leaflet map fragments.
//!
//! [`render_map`] turns the valid-coordinate markers, an optional boundary
//! overlay and the source's [`MapSettings`] into a self-contained HTML
//! fragment. All per-request data travels in a single JSON descriptor
//! embedded in a `<script type="application/json">` block; the only
//! executable code is the fixed runtime in `assets/dashboard-map.js`.

use crime_dashboard_incident_models::DerivedIncident;
use crime_dashboard_source_models::{MapSettings, OverlayStyle};
use geojson::FeatureCollection;
use serde::Serialize;
use thiserror::Error;

/// DOM id of the map container.
pub const MAP_CONTAINER_ID: &str = "crime-dashboard-map";

/// Fragment shown instead of a map when no record has usable coordinates.
pub const NO_COORDINATES_HTML: &str =
    "<p>No crimes with valid coordinates found based on the filters.</p>";

/// Popup text for records without a category.
pub const UNLABELED_MARKER: &str = "Unknown";

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const CLUSTER_CSS: &str = "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css";
const CLUSTER_DEFAULT_CSS: &str =
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css";
const CLUSTER_JS: &str =
    "https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js";

const MAP_RUNTIME_JS: &str = include_str!("../assets/dashboard-map.js");

/// Errors that can occur while rendering a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map descriptor could not be serialized.
    #[error("Failed to serialize map descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),
}

/// One map marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Popup text.
    pub label: String,
}

/// Builds one marker per record whose coordinates are present and finite.
#[must_use]
pub fn valid_coordinates(records: &[&DerivedIncident]) -> Vec<MapMarker> {
    records
        .iter()
        .filter_map(|r| {
            let (latitude, longitude) = r.incident.coordinates()?;
            Some(MapMarker {
                latitude,
                longitude,
                label: r
                    .incident
                    .primary_description
                    .clone()
                    .unwrap_or_else(|| UNLABELED_MARKER.to_string()),
            })
        })
        .collect()
}

/// Boundary polygons drawn over the markers.
#[derive(Debug, Clone)]
pub struct BoundaryOverlay {
    /// Polygons to draw.
    pub features: FeatureCollection,
    /// Name shown in the layer toggle.
    pub label: String,
    /// Stroke, fill and hover styling.
    pub style: OverlayStyle,
}

/// Result of [`render_map`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedMap {
    /// An interactive map fragment.
    Map(String),
    /// No marker had valid coordinates.
    Placeholder,
}

impl RenderedMap {
    /// The HTML to embed in the page.
    #[must_use]
    pub fn html(&self) -> &str {
        match self {
            Self::Map(html) => html,
            Self::Placeholder => NO_COORDINATES_HTML,
        }
    }

    /// Whether this is the no-coordinates notice.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MapDescriptor<'a> {
    container_id: &'a str,
    center: [f64; 2],
    zoom: u8,
    tiles: TileDescriptor<'a>,
    cluster: bool,
    markers: &'a [MapMarker],
    overlay: Option<OverlayDescriptor<'a>>,
}

#[derive(Serialize)]
struct TileDescriptor<'a> {
    url: &'a str,
    attribution: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverlayDescriptor<'a> {
    label_html: String,
    style: &'a OverlayStyle,
    features: &'a FeatureCollection,
}

/// Renders the map fragment, or [`RenderedMap::Placeholder`] when
/// `markers` is empty.
///
/// # Errors
///
/// Returns [`MapError::Descriptor`] if the descriptor cannot be serialized.
pub fn render_map(
    markers: &[MapMarker],
    overlay: Option<&BoundaryOverlay>,
    settings: &MapSettings,
) -> Result<RenderedMap, MapError> {
    if markers.is_empty() {
        log::debug!("No markers with valid coordinates, rendering placeholder");
        return Ok(RenderedMap::Placeholder);
    }

    let descriptor = MapDescriptor {
        container_id: MAP_CONTAINER_ID,
        center: [settings.center_latitude, settings.center_longitude],
        zoom: settings.zoom,
        tiles: TileDescriptor {
            url: settings.tiles.url_template(),
            attribution: settings.tiles.attribution(),
        },
        cluster: settings.cluster_markers,
        markers,
        overlay: overlay.map(|o| OverlayDescriptor {
            label_html: escape_html(&o.label),
            style: &o.style,
            features: &o.features,
        }),
    };
    let json = script_safe_json(&descriptor)?;

    let cluster_assets = if settings.cluster_markers {
        format!(
            r#"<link rel="stylesheet" href="{CLUSTER_CSS}">
<link rel="stylesheet" href="{CLUSTER_DEFAULT_CSS}">
<script src="{CLUSTER_JS}"></script>
"#
        )
    } else {
        String::new()
    };

    log::debug!(
        "Rendering map with {} markers (overlay: {}, clustered: {})",
        markers.len(),
        overlay.is_some(),
        settings.cluster_markers
    );

    Ok(RenderedMap::Map(format!(
        r#"<link rel="stylesheet" href="{LEAFLET_CSS}">
<script src="{LEAFLET_JS}"></script>
{cluster_assets}<div id="{MAP_CONTAINER_ID}" class="crime-map" style="height: 600px;"></div>
<script type="application/json" id="{MAP_CONTAINER_ID}-data">{json}</script>
<script>{MAP_RUNTIME_JS}</script>"#
    )))
}

/// Serializes `value` as JSON that is safe to place inside a `<script>`
/// element.
///
/// `<`, `>` and `&` only ever occur inside JSON strings, where the
/// `\uXXXX` escapes decode to the same characters.
///
/// # Errors
///
/// Returns [`MapError::Descriptor`] if serialization fails.
pub fn script_safe_json<T: Serialize>(value: &T) -> Result<String, MapError> {
    Ok(serde_json::to_string(value)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Escapes text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
