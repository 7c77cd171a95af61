#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime incident record types and derived time features.
//!
//! Upstream rows are deserialized into [`RawIncident`], validated into a
//! typed [`Incident`] (the timestamp is parsed exactly once, here), and
//! enriched with [`IncidentFeatures`] to form a [`DerivedIncident`].

pub mod parsing;

use chrono::{Datelike as _, NaiveDate, NaiveDateTime, Timelike as _};
use serde::{Deserialize, Serialize};

/// An incident row exactly as the open-data API returns it.
///
/// Column names follow the Chicago "Crimes - One year prior to present"
/// dataset, which spells the category column `_primary_decsription` and
/// the case number `case_`. Extra columns are ignored. A row carrying both
/// spellings of a column keeps the canonical one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "IncidentRow")]
pub struct RawIncident {
    /// Case identifier.
    pub id: Option<String>,
    /// Occurrence timestamp, unparsed.
    pub date_of_occurrence: Option<String>,
    /// Crime category label (e.g. `"THEFT"`).
    pub primary_description: Option<String>,
    /// Ward identifier, normalized to a string.
    pub ward: Option<String>,
    /// Latitude (WGS84), `None` when missing or non-numeric.
    pub latitude: Option<f64>,
    /// Longitude (WGS84), `None` when missing or non-numeric.
    pub longitude: Option<f64>,
}

/// Wire shape of an incident row, one field per upstream column spelling.
#[derive(Deserialize)]
struct IncidentRow {
    #[serde(default, deserialize_with = "parsing::lenient_string")]
    id: Option<String>,
    #[serde(default, rename = "case_", deserialize_with = "parsing::lenient_string")]
    case_number: Option<String>,
    #[serde(default, deserialize_with = "parsing::lenient_string")]
    date_of_occurrence: Option<String>,
    #[serde(default, deserialize_with = "parsing::lenient_string")]
    primary_description: Option<String>,
    #[serde(
        default,
        rename = "_primary_decsription",
        deserialize_with = "parsing::lenient_string"
    )]
    primary_decsription: Option<String>,
    #[serde(default, deserialize_with = "parsing::lenient_string")]
    ward: Option<String>,
    #[serde(default, deserialize_with = "parsing::lenient_f64")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "parsing::lenient_f64")]
    longitude: Option<f64>,
}

impl From<IncidentRow> for RawIncident {
    fn from(row: IncidentRow) -> Self {
        Self {
            id: row.id.or(row.case_number),
            date_of_occurrence: row.date_of_occurrence,
            primary_description: row.primary_description.or(row.primary_decsription),
            ward: row.ward,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}

/// Error returned when a [`RawIncident`] cannot be turned into an
/// [`Incident`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncidentError {
    /// The record has no `date_of_occurrence` value.
    MissingTimestamp {
        /// Case identifier of the offending record, if any.
        id: Option<String>,
    },
    /// The `date_of_occurrence` value is not a recognizable timestamp.
    InvalidTimestamp {
        /// Case identifier of the offending record, if any.
        id: Option<String>,
        /// The value that failed to parse.
        value: String,
    },
}

impl std::fmt::Display for IncidentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTimestamp { id } => write!(
                f,
                "incident {} has no date_of_occurrence",
                id.as_deref().unwrap_or("<unknown>")
            ),
            Self::InvalidTimestamp { id, value } => write!(
                f,
                "incident {} has an unparseable date_of_occurrence: {value:?}",
                id.as_deref().unwrap_or("<unknown>")
            ),
        }
    }
}

impl std::error::Error for IncidentError {}

/// A validated incident with a parsed timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Case identifier.
    pub id: Option<String>,
    /// When the incident occurred (local wall-clock time).
    pub occurred_at: NaiveDateTime,
    /// Crime category label.
    pub primary_description: Option<String>,
    /// Ward identifier.
    pub ward: Option<String>,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
}

impl Incident {
    /// Calendar date of the occurrence.
    #[must_use]
    pub fn occurred_on(&self) -> NaiveDate {
        self.occurred_at.date()
    }

    /// Returns `(latitude, longitude)` when both are present and finite.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let latitude = self.latitude.filter(|v| v.is_finite())?;
        let longitude = self.longitude.filter(|v| v.is_finite())?;
        Some((latitude, longitude))
    }
}

impl TryFrom<RawIncident> for Incident {
    type Error = IncidentError;

    fn try_from(raw: RawIncident) -> Result<Self, Self::Error> {
        let Some(value) = raw.date_of_occurrence else {
            return Err(IncidentError::MissingTimestamp { id: raw.id });
        };
        let Some(occurred_at) = parsing::parse_timestamp(&value) else {
            return Err(IncidentError::InvalidTimestamp { id: raw.id, value });
        };

        Ok(Self {
            id: raw.id,
            occurred_at,
            primary_description: raw.primary_description,
            ward: raw.ward,
            latitude: raw.latitude,
            longitude: raw.longitude,
        })
    }
}

/// Time features derived from an incident's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentFeatures {
    /// Hour of day, 0-23.
    pub hour: u8,
    /// Weekday, 0 = Monday through 6 = Sunday.
    pub day_of_week: u8,
    /// Month, 1-12.
    pub month: u8,
    /// Calendar year.
    pub year: i32,
    /// Whether the incident fell on a Saturday or Sunday.
    pub is_weekend: bool,
}

impl IncidentFeatures {
    /// Derives the features from a timestamp.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        let day_of_week = timestamp.weekday().num_days_from_monday() as u8;
        Self {
            hour: timestamp.hour() as u8,
            day_of_week,
            month: timestamp.month() as u8,
            year: timestamp.year(),
            is_weekend: day_of_week >= 5,
        }
    }
}

/// An incident together with its derived time features.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedIncident {
    /// The validated record.
    #[serde(flatten)]
    pub incident: Incident,
    /// Features computed from [`Incident::occurred_at`].
    #[serde(flatten)]
    pub features: IncidentFeatures,
}

impl From<Incident> for DerivedIncident {
    fn from(incident: Incident) -> Self {
        let features = IncidentFeatures::from_timestamp(incident.occurred_at);
        Self { incident, features }
    }
}
