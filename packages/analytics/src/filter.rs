//! Request filter validation and application.
//!
//! [`criteria`] turns the raw query parameters into [`FilterCriteria`]
//! once per request; [`apply`] is then a pure mask over the derived table.

use crime_dashboard_analytics_models::{ALL_SENTINEL, DateRange, FilterCriteria};
use crime_dashboard_incident_models::DerivedIncident;

/// Normalizes a selector value: absent, blank, or `"All"` means no
/// constraint.
fn selection(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL_SENTINEL)
        .map(str::to_string)
}

/// Builds filter criteria from raw request parameters.
///
/// The date filter is only set when both bounds are present and both parse
/// as `YYYY-MM-DD`. A malformed pair is logged and the date filter is
/// skipped; the category and ward filters still apply.
#[must_use]
pub fn criteria(
    primary_type: Option<&str>,
    ward: Option<&str>,
    date_from: Option<&str>,
    date_to: Option<&str>,
) -> FilterCriteria {
    let date_range = match (selection(date_from), selection(date_to)) {
        (Some(from), Some(to)) => match DateRange::parse(&from, &to) {
            Ok(range) => Some(range),
            Err(e) => {
                log::warn!("Ignoring date filter {from}..{to}: {e}");
                None
            }
        },
        _ => None,
    };

    FilterCriteria {
        primary_type: selection(primary_type),
        ward: selection(ward),
        date_range,
    }
}

/// Whether a single incident passes every constraint in `criteria`.
#[must_use]
pub fn matches(record: &DerivedIncident, criteria: &FilterCriteria) -> bool {
    let incident = &record.incident;

    if let Some(primary_type) = &criteria.primary_type
        && incident.primary_description.as_deref() != Some(primary_type.as_str())
    {
        return false;
    }

    if let Some(ward) = &criteria.ward
        && incident.ward.as_deref() != Some(ward.as_str())
    {
        return false;
    }

    if let Some(range) = &criteria.date_range
        && !range.contains(incident.occurred_on())
    {
        return false;
    }

    true
}

/// Returns the incidents that pass `criteria`, in fetch order.
#[must_use]
pub fn apply<'a>(
    records: &'a [DerivedIncident],
    criteria: &FilterCriteria,
) -> Vec<&'a DerivedIncident> {
    if criteria.is_unconstrained() {
        log::debug!("No filters set, keeping all {} incidents", records.len());
        return records.iter().collect();
    }

    let filtered: Vec<_> = records.iter().filter(|r| matches(r, criteria)).collect();

    log::debug!(
        "Filter kept {} of {} incidents ({criteria:?})",
        filtered.len(),
        records.len()
    );

    filtered
}
