use super::historical::HistoricalPoint;
use super::prediction::PredictionData;
use super::validation::ValidationError;

/// Both published documents, loaded together for one page view
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDataset {
    pub historical: Vec<HistoricalPoint>,
    pub prediction: PredictionData,
}

impl ForecastDataset {
    /// The forecast must begin after the last observation it is anchored on
    pub fn check_alignment(&self) -> Result<(), ValidationError> {
        match (self.historical.last(), self.prediction.trajectory.first()) {
            (Some(last), Some(first)) if first.date <= last.date => {
                Err(ValidationError::ForecastNotAfterHistory {
                    anchor: last.date,
                    first: first.date,
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrajectoryPoint;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn dataset(history_until: u32, forecast_from: Option<u32>) -> ForecastDataset {
        ForecastDataset {
            historical: (1..=history_until)
                .map(|d| HistoricalPoint { date: day(d), value: 1000.0 + d as f64 })
                .collect(),
            prediction: PredictionData {
                prediction_generated_on: Utc.with_ymd_and_hms(2025, 1, 5, 21, 0, 0).unwrap(),
                anchor_price: 1005.0,
                trajectory: forecast_from
                    .map(|d| TrajectoryPoint {
                        date: day(d),
                        forecast_day: 1,
                        lower_bound: 1000.0,
                        upper_bound: 1030.0,
                    })
                    .into_iter()
                    .collect(),
            },
        }
    }

    #[test]
    fn forecast_after_history_is_aligned() {
        assert!(dataset(5, Some(6)).check_alignment().is_ok());
        assert!(dataset(5, None).check_alignment().is_ok());
        assert!(dataset(0, Some(3)).check_alignment().is_ok());
    }

    #[test]
    fn stale_forecast_is_rejected() {
        assert_eq!(
            dataset(5, Some(3)).check_alignment(),
            Err(ValidationError::ForecastNotAfterHistory { anchor: day(5), first: day(3) })
        );
        assert!(dataset(5, Some(5)).check_alignment().is_err());
    }
}
