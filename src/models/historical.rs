//! Observed exchange-rate history

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{check_finite, check_increasing, ValidationError};
use crate::utils::dates;

/// One observed trading day of the official USD/ARS rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// A record of the macro dataset as published by the data pipeline
///
/// Only the two fields the chart needs are read; the dataset carries many
/// other indicators per row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHistoricalRecord {
    #[serde(deserialize_with = "dates::deserialize_date")]
    pub fecha_dato: NaiveDate,
    pub dolar_oficial: f64,
}

impl From<RawHistoricalRecord> for HistoricalPoint {
    fn from(raw: RawHistoricalRecord) -> Self {
        HistoricalPoint {
            date: raw.fecha_dato,
            value: raw.dolar_oficial,
        }
    }
}

/// Validate a normalized history: finite values, one strictly ascending
/// observation per day
pub fn validate_history(points: &[HistoricalPoint]) -> Result<(), ValidationError> {
    for (index, point) in points.iter().enumerate() {
        check_finite("value", index, point.value)?;
    }
    check_increasing(points.iter().map(|p| p.date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_source_field_names() {
        let raw: Vec<RawHistoricalRecord> = serde_json::from_str(
            r#"[{"fecha_dato": "2025-01-01", "dolar_oficial": 1000.5, "tasa_badlar": 32.1}]"#,
        )
        .unwrap();
        let points: Vec<HistoricalPoint> = raw.into_iter().map(Into::into).collect();

        assert_eq!(
            points,
            vec![HistoricalPoint {
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                value: 1000.5,
            }]
        );
    }

    #[test]
    fn rejects_out_of_order_history() {
        let points = vec![
            HistoricalPoint { date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(), value: 1.0 },
            HistoricalPoint { date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(), value: 2.0 },
        ];
        assert!(matches!(
            validate_history(&points),
            Err(ValidationError::DatesNotIncreasing { index: 1, .. })
        ));
    }
}
