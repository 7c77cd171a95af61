#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard source definition types.
//!
//! A [`SourceDefinition`] describes everything city-specific about a
//! dashboard: which incident dataset to query and how many rows to ask
//! for, where to fetch the optional boundary overlay, and how the map is
//! framed and styled. Definitions are TOML files embedded at compile time.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// A complete dashboard source, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"chicago"`).
    pub id: String,
    /// Human-readable name shown in the page title.
    pub name: String,
    /// City name.
    pub city: String,
    /// Incident dataset endpoint.
    pub dataset: DatasetConfig,
    /// Optional boundary polygon overlay.
    #[serde(default)]
    pub boundaries: Option<BoundaryConfig>,
    /// Map framing and presentation.
    pub map: MapSettings,
}

impl SourceDefinition {
    /// Returns the source identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the human-readable source name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Socrata incident dataset endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Resource URL (e.g., `"https://data.cityofchicago.org/resource/x2n5-8w5q.json"`).
    pub api_url: String,
    /// Value of the `$limit` query parameter.
    pub row_limit: u64,
}

/// Boundary overlay endpoint and styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// URL returning a `GeoJSON` `FeatureCollection`.
    pub url: String,
    /// Layer label shown in the map's layer control.
    pub label: String,
    /// Declarative style for the polygons.
    #[serde(default)]
    pub style: OverlayStyle,
}

/// Declarative style and hover behaviour for an overlay layer.
///
/// Serialized as-is into the page and interpreted by the client-side map
/// script, so no per-request code is generated. TOML keys are snake_case;
/// the serialized form uses the map library's camelCase option names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    default,
    rename_all(serialize = "camelCase", deserialize = "snake_case")
)]
pub struct OverlayStyle {
    /// Stroke color.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
    /// Fill color.
    pub fill_color: String,
    /// Fill opacity, 0-1.
    pub fill_opacity: f64,
    /// Stroke width while hovered.
    pub highlight_weight: f64,
    /// Fill opacity while hovered.
    pub highlight_fill_opacity: f64,
    /// Feature property shown as a hover tooltip.
    pub tooltip_property: Option<String>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: "#3b82f6".to_string(),
            weight: 1.0,
            fill_color: "#3b82f6".to_string(),
            fill_opacity: 0.05,
            highlight_weight: 3.0,
            highlight_fill_opacity: 0.25,
            tooltip_property: None,
        }
    }
}

/// How the base map is framed and drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    /// Latitude of the initial map center.
    pub center_latitude: f64,
    /// Longitude of the initial map center.
    pub center_longitude: f64,
    /// Initial zoom level.
    pub zoom: u8,
    /// Base tile layer.
    #[serde(default)]
    pub tiles: TileLayer,
    /// Whether markers are grouped into a clustering layer.
    #[serde(default)]
    pub cluster_markers: bool,
}

/// Base map tile providers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TileLayer {
    /// Standard `OpenStreetMap` tiles
    #[default]
    OpenStreetMap,
    /// CARTO light basemap
    CartoDbPositron,
    /// CARTO dark basemap
    CartoDbDarkMatter,
}

impl TileLayer {
    /// Tile URL template for the map library.
    #[must_use]
    pub const fn url_template(self) -> &'static str {
        match self {
            Self::OpenStreetMap => "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
            Self::CartoDbPositron => "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png",
            Self::CartoDbDarkMatter => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png",
        }
    }

    /// Attribution HTML required by the tile provider.
    #[must_use]
    pub const fn attribution(self) -> &'static str {
        match self {
            Self::OpenStreetMap => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors"
            }
            Self::CartoDbPositron | Self::CartoDbDarkMatter => {
                "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
            }
        }
    }
}
