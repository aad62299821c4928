//! Loads the published history and prediction documents

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api::storage::{ObjectFetcher, StorageError};
use crate::models::historical::validate_history;
use crate::models::{
    ForecastDataset, HistoricalPoint, PredictionData, RawHistoricalRecord, ValidationError,
};
use crate::utils::error_chain;

/// Relative gap between `anchor_price` and the last observation worth a warning
const ANCHOR_DRIFT_TOLERANCE: f64 = 0.05;

/// Storage keys of the two documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectKeys {
    pub historical: String,
    pub prediction: String,
}

impl ObjectKeys {
    pub const DEFAULT_HISTORICAL: &'static str = "raw/dataset_macro.json";
    pub const DEFAULT_PREDICTION: &'static str = "raw/prediccion_dolar.json";
}

impl Default for ObjectKeys {
    fn default() -> Self {
        Self {
            historical: Self::DEFAULT_HISTORICAL.to_string(),
            prediction: Self::DEFAULT_PREDICTION.to_string(),
        }
    }
}

/// Failure to obtain a trusted document
#[derive(Debug, Error)]
pub enum DataFetchError {
    /// Network or storage failure, or the object does not exist
    #[error("failed to download '{key}': {source}")]
    Fetch {
        key: String,
        #[source]
        source: StorageError,
    },
    /// Not JSON, or required fields missing / mistyped
    #[error("failed to decode '{key}': {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// Decoded but breaks an ordering or range rule
    #[error("invalid data in '{key}': {source}")]
    Invalid {
        key: String,
        #[source]
        source: ValidationError,
    },
}

impl DataFetchError {
    pub fn key(&self) -> &str {
        match self {
            DataFetchError::Fetch { key, .. }
            | DataFetchError::Parse { key, .. }
            | DataFetchError::Invalid { key, .. } => key,
        }
    }

    /// True for payload problems, false for transport/storage problems
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, DataFetchError::Fetch { .. })
    }
}

pub struct DataService<F> {
    fetcher: F,
    keys: ObjectKeys,
}

impl<F: ObjectFetcher> DataService<F> {
    pub fn new(fetcher: F, keys: ObjectKeys) -> Self {
        Self { fetcher, keys }
    }

    /// Download the macro dataset and normalize it to `HistoricalPoint`s
    pub async fn fetch_historical_data(&self) -> Result<Vec<HistoricalPoint>, DataFetchError> {
        let key = &self.keys.historical;
        let records: Vec<RawHistoricalRecord> = self.get_json(key).await?;
        let points: Vec<HistoricalPoint> = records.into_iter().map(HistoricalPoint::from).collect();

        validate_history(&points).map_err(|source| self.invalid(key, source))?;

        info!("📜 Loaded {} historical points from '{}'", points.len(), key);
        Ok(points)
    }

    /// Download the prediction document as-is
    pub async fn fetch_prediction_data(&self) -> Result<PredictionData, DataFetchError> {
        let key = &self.keys.prediction;
        let prediction: PredictionData = self.get_json(key).await?;

        prediction
            .validate()
            .map_err(|source| self.invalid(key, source))?;

        info!(
            "🔮 Loaded prediction generated on {} with {} forecast days",
            prediction.prediction_generated_on,
            prediction.trajectory.len()
        );
        Ok(prediction)
    }

    /// Fetch both documents concurrently; either failure fails the pair
    pub async fn load_all(&self) -> Result<ForecastDataset, DataFetchError> {
        let (prediction, historical) =
            tokio::try_join!(self.fetch_prediction_data(), self.fetch_historical_data())?;

        if let Some(last) = historical.last() {
            let drift = (prediction.anchor_price - last.value).abs();
            if drift > last.value.abs() * ANCHOR_DRIFT_TOLERANCE {
                warn!(
                    "Anchor price {} differs from last observation {} on {}",
                    prediction.anchor_price, last.value, last.date
                );
            }
        }

        let dataset = ForecastDataset {
            historical,
            prediction,
        };
        dataset
            .check_alignment()
            .map_err(|source| self.invalid(&self.keys.prediction, source))?;

        Ok(dataset)
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<T, DataFetchError> {
        debug!("Fetching '{}'", key);

        let bytes = self.fetcher.get_object(key).await.map_err(|source| {
            let err = DataFetchError::Fetch {
                key: key.to_string(),
                source,
            };
            error!("Error fetching object: {}", error_chain(&err));
            err
        })?;

        serde_json::from_slice(&bytes).map_err(|source| {
            let err = DataFetchError::Parse {
                key: key.to_string(),
                source,
            };
            error!("Error decoding object: {}", error_chain(&err));
            err
        })
    }

    fn invalid(&self, key: &str, source: ValidationError) -> DataFetchError {
        let err = DataFetchError::Invalid {
            key: key.to_string(),
            source,
        };
        error!("Rejected object: {}", error_chain(&err));
        err
    }
}
