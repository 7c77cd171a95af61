#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter criteria and aggregate result types.
//!
//! [`FilterCriteria`] is the validated form of the dashboard's query
//! parameters: every dimension is an explicit `Option`, so "no constraint"
//! is `None` rather than a sentinel string. Aggregates ([`CategoryCount`],
//! [`TimeBreakdown`]) are serialized as-is by the JSON API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Selector value meaning "no constraint on this dimension".
pub const ALL_SENTINEL: &str = "All";

/// Date format accepted for range bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day included.
    pub from: NaiveDate,
    /// Last day included.
    pub to: NaiveDate,
}

impl DateRange {
    /// Parses both bounds as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDateError`] naming the first bound that does not
    /// parse.
    pub fn parse(from: &str, to: &str) -> Result<Self, InvalidDateError> {
        Ok(Self {
            from: parse_date(from)?,
            to: parse_date(to)?,
        })
    }

    /// Whether `date` falls within the range, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, InvalidDateError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| InvalidDateError {
        value: s.to_string(),
    })
}

/// Error returned when a date bound is not `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateError {
    /// The value that failed to parse.
    pub value: String,
}

impl std::fmt::Display for InvalidDateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date {:?}: expected YYYY-MM-DD", self.value)
    }
}

impl std::error::Error for InvalidDateError {}

/// Validated dashboard filters. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Exact crime category to keep.
    pub primary_type: Option<String>,
    /// Exact ward (string comparison) to keep.
    pub ward: Option<String>,
    /// Inclusive occurrence date range.
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    /// Whether no dimension is constrained.
    #[must_use]
    pub const fn is_unconstrained(&self) -> bool {
        self.primary_type.is_none() && self.ward.is_none() && self.date_range.is_none()
    }
}

/// Number of incidents in one crime category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Category label (e.g. `"THEFT"`).
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

/// When filtered incidents happened, bucketed by derived time features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBreakdown {
    /// Counts per hour of day, index 0 = midnight.
    pub by_hour: [u64; 24],
    /// Counts per weekday, index 0 = Monday.
    pub by_day_of_week: [u64; 7],
    /// Incidents on Saturdays and Sundays.
    pub weekend: u64,
    /// Incidents Monday through Friday.
    pub weekday: u64,
}

impl Default for TimeBreakdown {
    fn default() -> Self {
        Self {
            by_hour: [0; 24],
            by_day_of_week: [0; 7],
            weekend: 0,
            weekday: 0,
        }
    }
}

impl TimeBreakdown {
    /// Total incidents counted.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.weekend + self.weekday
    }
}
