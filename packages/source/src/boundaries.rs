//! Boundary overlay fetcher.
//!
//! Fetches a standard `GeoJSON` `FeatureCollection` from any URL that
//! returns it directly (Socrata geospatial exports, static files).

use geojson::{FeatureCollection, GeoJson};

use crate::SourceError;

/// Fetches a `FeatureCollection` from a direct `GeoJSON` URL.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails, the server answers with a
/// non-success status, or the body is not a `FeatureCollection`.
pub async fn fetch_feature_collection(
    client: &reqwest::Client,
    url: &str,
) -> Result<FeatureCollection, SourceError> {
    log::info!("Fetching boundary overlay from {url}");
    let resp = client.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status,
        });
    }
    let body = resp.text().await?;

    let collection = parse_feature_collection(&body)?;
    log::info!("Loaded {} boundary features", collection.features.len());

    Ok(collection)
}

/// Parses a `GeoJSON` body that must be a `FeatureCollection`.
///
/// # Errors
///
/// Returns [`SourceError::GeoJson`] if the body is not valid `GeoJSON` or
/// is a bare geometry or feature.
pub fn parse_feature_collection(body: &str) -> Result<FeatureCollection, SourceError> {
    let geojson: GeoJson = body.parse()?;
    Ok(FeatureCollection::try_from(geojson)?)
}
