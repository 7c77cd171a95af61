//! Aggregations over the incident table.

use std::collections::{BTreeSet, HashMap};

use crime_dashboard_analytics_models::{CategoryCount, TimeBreakdown};
use crime_dashboard_incident_models::DerivedIncident;

/// Number of categories returned by [`top_categories`].
pub const TOP_CATEGORY_LIMIT: usize = 10;

/// Counts incidents per category and returns the most frequent ones.
///
/// Ordered by count descending; ties keep the order in which each category
/// was first seen. Records without a category are not counted.
#[must_use]
pub fn top_categories(records: &[&DerivedIncident], limit: usize) -> Vec<CategoryCount> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for category in records
        .iter()
        .filter_map(|r| r.incident.primary_description.as_deref())
    {
        if let Some(&i) = index.get(category) {
            counts[i].count += 1;
        } else {
            index.insert(category, counts.len());
            counts.push(CategoryCount {
                category: category.to_string(),
                count: 1,
            });
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Sorted, de-duplicated categories present in the table.
#[must_use]
pub fn distinct_categories(records: &[DerivedIncident]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.incident.primary_description.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// De-duplicated wards present in the table.
///
/// Numeric wards come first in numeric order, then any other values
/// lexically.
#[must_use]
pub fn distinct_wards(records: &[DerivedIncident]) -> Vec<String> {
    let mut wards: Vec<&str> = records
        .iter()
        .filter_map(|r| r.incident.ward.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    wards.sort_by(|a, b| match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    });

    wards.into_iter().map(str::to_string).collect()
}

/// Buckets incidents by hour of day and weekday.
#[must_use]
pub fn time_breakdown(records: &[&DerivedIncident]) -> TimeBreakdown {
    let mut breakdown = TimeBreakdown::default();

    for record in records {
        let f = record.features;
        breakdown.by_hour[usize::from(f.hour)] += 1;
        breakdown.by_day_of_week[usize::from(f.day_of_week)] += 1;
        if f.is_weekend {
            breakdown.weekend += 1;
        } else {
            breakdown.weekday += 1;
        }
    }

    breakdown
}
