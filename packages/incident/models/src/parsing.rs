//! Lenient value coercion for upstream incident records.
//!
//! Open-data portals are loose about scalar types: the same column can
//! arrive as a JSON string in one export and a number in another, and
//! coordinates are frequently blank. These helpers normalize such values
//! at deserialization time so the typed records never carry raw JSON.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Any scalar JSON value. Arrays and objects are absorbed by
/// [`Scalar::Other`] so that an odd column never fails a whole record.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl Scalar {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Int(value) => Some(value.to_string()),
            Self::Float(value) => float_to_text(value),
            Self::Text(value) => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Self::Other(_) => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn into_f64(self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(value as f64),
            Self::Float(value) => Some(value),
            Self::Text(value) => value.trim().parse::<f64>().ok(),
            Self::Other(_) => None,
        }
        .filter(|v| v.is_finite())
    }
}

/// Renders whole floats without a fractional part (`5.0` becomes `"5"`).
#[allow(clippy::cast_possible_truncation)]
fn float_to_text(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        Some((value as i64).to_string())
    } else {
        Some(value.to_string())
    }
}

/// Deserializes a string-or-number field into an optional string.
///
/// Blank strings, nulls and non-scalar values become `None`.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce any value.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.and_then(Scalar::into_text))
}

/// Deserializes a string-or-number field into an optional finite `f64`.
///
/// Values that cannot be coerced to a number become `None`, mirroring a
/// numeric coercion that maps errors to missing values.
///
/// # Errors
///
/// Only fails if the underlying deserializer fails to produce any value.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.and_then(Scalar::into_f64))
}

/// Parses an upstream timestamp.
///
/// Accepts Socrata floating timestamps (`2024-01-15T14:30:00.000`), the
/// same with a space separator, RFC 3339 with an offset (kept as wall-clock
/// time), and bare dates (midnight).
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
