//! Data models for the forecast chart
//!
//! Inputs (history and prediction documents) are read-only once decoded;
//! chart series and configuration are derived per render.

pub mod chart;
pub mod dataset;
pub mod historical;
pub mod prediction;
pub mod validation;

pub use chart::{ChartConfig, ChartSeries, IntervalRow, SeriesPoint};
pub use dataset::ForecastDataset;
pub use historical::{HistoricalPoint, RawHistoricalRecord};
pub use prediction::{PredictionData, TrajectoryPoint};
pub use validation::ValidationError;
