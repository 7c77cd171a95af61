//! Timestamp parsing and time feature derivation.

use crime_dashboard_incident_models::{DerivedIncident, Incident, RawIncident};

use crate::AnalyticsError;

/// Converts raw records into typed incidents with derived time features.
///
/// # Errors
///
/// Returns [`AnalyticsError::Incident`] for the first record whose
/// timestamp is missing or cannot be parsed.
pub fn derive_features(raw: Vec<RawIncident>) -> Result<Vec<DerivedIncident>, AnalyticsError> {
    let derived = raw
        .into_iter()
        .map(|record| Incident::try_from(record).map(DerivedIncident::from))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("Derived time features for {} incidents", derived.len());

    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, date: Option<&str>) -> RawIncident {
        RawIncident {
            id: Some(id.to_string()),
            date_of_occurrence: date.map(str::to_string),
            primary_description: Some("THEFT".to_string()),
            ..RawIncident::default()
        }
    }

    #[test]
    fn derives_features_for_every_record() {
        let derived = derive_features(vec![
            raw("A1", Some("2024-01-06T23:15:00.000")),
            raw("A2", Some("2024-01-08 07:00:00")),
        ])
        .unwrap();

        assert_eq!(derived.len(), 2);

        // 2024-01-06 is a Saturday.
        assert_eq!(derived[0].features.hour, 23);
        assert_eq!(derived[0].features.day_of_week, 5);
        assert!(derived[0].features.is_weekend);

        assert_eq!(derived[1].features.hour, 7);
        assert_eq!(derived[1].features.day_of_week, 0);
        assert_eq!(derived[1].features.month, 1);
        assert_eq!(derived[1].features.year, 2024);
        assert!(!derived[1].features.is_weekend);
    }

    #[test]
    fn feature_ranges_hold() {
        let dates = [
            "2023-12-31T00:00:00",
            "2024-02-29T12:30:00",
            "2024-07-04T23:59:59",
            "2024-11-10",
        ];
        let derived = derive_features(
            dates
                .iter()
                .enumerate()
                .map(|(i, d)| raw(&i.to_string(), Some(d)))
                .collect(),
        )
        .unwrap();

        for record in &derived {
            let f = record.features;
            assert!(f.hour <= 23);
            assert!(f.day_of_week <= 6);
            assert!((1..=12).contains(&f.month));
            assert_eq!(f.is_weekend, f.day_of_week >= 5);
        }
    }

    #[test]
    fn empty_table_is_fine() {
        assert!(derive_features(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn missing_timestamp_fails() {
        let err = derive_features(vec![raw("A1", Some("2024-01-01")), raw("A2", None)]).unwrap_err();
        assert!(matches!(err, AnalyticsError::Incident(_)));
    }

    #[test]
    fn unparseable_timestamp_fails() {
        let err = derive_features(vec![raw("A1", Some("yesterday"))]).unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }
}
