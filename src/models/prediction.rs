//! Forecast document produced by the prediction model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{check_finite, check_increasing, ValidationError};
use crate::utils::dates;

/// One forecast day with its confidence interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    #[serde(deserialize_with = "dates::deserialize_date")]
    pub date: NaiveDate,
    pub forecast_day: u32,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// The full prediction object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionData {
    #[serde(deserialize_with = "dates::deserialize_timestamp")]
    pub prediction_generated_on: DateTime<Utc>,
    /// Last observed price when the model ran. Expected to track the last
    /// historical value but never enforced.
    pub anchor_price: f64,
    pub trajectory: Vec<TrajectoryPoint>,
}

impl PredictionData {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_finite("anchor_price", 0, self.anchor_price)?;

        let mut previous_day = 0;
        for (index, point) in self.trajectory.iter().enumerate() {
            check_finite("lower_bound", index, point.lower_bound)?;
            check_finite("upper_bound", index, point.upper_bound)?;

            if point.lower_bound > point.upper_bound {
                return Err(ValidationError::InvertedBounds {
                    date: point.date,
                    lower: point.lower_bound,
                    upper: point.upper_bound,
                });
            }

            let in_order = if index == 0 {
                point.forecast_day == 1
            } else {
                point.forecast_day > previous_day
            };
            if !in_order {
                return Err(ValidationError::ForecastDayOrder {
                    index,
                    found: point.forecast_day,
                });
            }
            previous_day = point.forecast_day;
        }

        check_increasing(self.trajectory.iter().map(|p| p.date))
    }
}
