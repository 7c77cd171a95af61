//! Socrata SODA API fetcher.
//!
//! Issues a single request against a Socrata resource with a `$limit`
//! query parameter. There is no pagination, ordering or retry; whatever
//! the first page holds is the dashboard's table.

use crime_dashboard_incident_models::RawIncident;

use crate::SourceError;

/// Configuration for a Socrata fetch operation.
pub struct SocrataConfig<'a> {
    /// Resource URL (e.g., `"https://data.cityofchicago.org/resource/x2n5-8w5q.json"`).
    pub api_url: &'a str,
    /// Value of the `$limit` query parameter.
    pub row_limit: u64,
    /// Label for log messages (e.g., `"Chicago"`).
    pub label: &'a str,
}

impl SocrataConfig<'_> {
    /// Builds the request URL, appending `$limit` to any existing query.
    #[must_use]
    pub fn url(&self) -> String {
        let separator = if self.api_url.contains('?') { '&' } else { '?' };
        format!("{}{separator}$limit={}", self.api_url, self.row_limit)
    }
}

/// Fetches one page of records from a Socrata dataset.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails, the server answers with a
/// non-success status, or the body is not a JSON array of records.
pub async fn fetch_socrata(
    client: &reqwest::Client,
    config: &SocrataConfig<'_>,
) -> Result<Vec<RawIncident>, SourceError> {
    let url = config.url();

    log::info!(
        "Fetching {} data: limit={}",
        config.label,
        config.row_limit
    );
    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status { url, status });
    }

    let body = response.text().await?;
    let records = parse_records(&body)?;

    log::info!("Downloaded {} {} records", records.len(), config.label);

    Ok(records)
}

/// Parses a Socrata JSON array body into raw incident rows.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the body is not a JSON array of
/// objects.
pub fn parse_records(body: &str) -> Result<Vec<RawIncident>, SourceError> {
    Ok(serde_json::from_str(body)?)
}
