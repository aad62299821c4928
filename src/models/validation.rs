//! Shape checks applied to decoded payloads before they are trusted

use chrono::NaiveDate;
use thiserror::Error;

/// A decoded payload that parsed but breaks an ordering or range rule
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} is not a finite number at index {index}")]
    NonFinite { field: &'static str, index: usize },

    #[error("lower bound {lower} exceeds upper bound {upper} on {date}")]
    InvertedBounds { date: NaiveDate, lower: f64, upper: f64 },

    #[error("dates must strictly increase: {current} follows {previous} at index {index}")]
    DatesNotIncreasing {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("forecast_day must start at 1 and increase, found {found} at index {index}")]
    ForecastDayOrder { index: usize, found: u32 },

    #[error("forecast starts on {first}, not after the last observation on {anchor}")]
    ForecastNotAfterHistory { anchor: NaiveDate, first: NaiveDate },
}

/// Check that a date sequence is strictly increasing
pub(crate) fn check_increasing<I>(dates: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut previous: Option<NaiveDate> = None;
    for (index, current) in dates.into_iter().enumerate() {
        if let Some(previous) = previous {
            if current <= previous {
                return Err(ValidationError::DatesNotIncreasing {
                    index,
                    previous,
                    current,
                });
            }
        }
        previous = Some(current);
    }
    Ok(())
}

pub(crate) fn check_finite(field: &'static str, index: usize, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite { field, index })
    }
}
