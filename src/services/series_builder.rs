//! Builds the chart series from history and prediction
//!
//! Every forecast series starts at the anchor (the last observation) so the
//! forecast joins the history without a gap. The interval rows are computed
//! once; the central line and the band outline are both read off them.

use thiserror::Error;

use crate::models::{ChartSeries, HistoricalPoint, IntervalRow, PredictionData, SeriesPoint};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("historical series is empty, the forecast has no anchor")]
    EmptyHistorical,
}

pub fn build_series(
    historical: &[HistoricalPoint],
    prediction: &PredictionData,
) -> Result<ChartSeries, BuilderError> {
    let last = historical.last().ok_or(BuilderError::EmptyHistorical)?;
    let anchor: SeriesPoint = (last.date, last.value);

    let intervals = interval_rows(anchor, prediction);
    let central = intervals.iter().map(|row| (row.date, row.midpoint())).collect();
    let band_polygon = band_polygon(&intervals);

    Ok(ChartSeries {
        anchor,
        historical: historical.iter().map(|p| (p.date, p.value)).collect(),
        central,
        band_polygon,
        intervals,
    })
}

/// Anchor row (both bounds equal to the anchor value) followed by one row per
/// forecast day
fn interval_rows(anchor: SeriesPoint, prediction: &PredictionData) -> Vec<IntervalRow> {
    let mut rows = Vec::with_capacity(prediction.trajectory.len() + 1);
    rows.push(IntervalRow {
        date: anchor.0,
        lower: anchor.1,
        upper: anchor.1,
    });
    rows.extend(prediction.trajectory.iter().map(|p| IntervalRow {
        date: p.date,
        lower: p.lower_bound,
        upper: p.upper_bound,
    }));
    rows
}

/// Anchor, upper bounds in date order, lower bounds in reverse date order.
/// The path closes back onto the anchor.
fn band_polygon(rows: &[IntervalRow]) -> Vec<SeriesPoint> {
    let Some((anchor, forecast)) = rows.split_first() else {
        return Vec::new();
    };

    let mut path = Vec::with_capacity(1 + 2 * forecast.len());
    path.push((anchor.date, anchor.upper));
    path.extend(forecast.iter().map(|row| (row.date, row.upper)));
    path.extend(forecast.iter().rev().map(|row| (row.date, row.lower)));
    path
}
