//! Runtime configuration read from the environment (and `.env`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::api::storage::{GuestUrlSigner, StorageClient};
use crate::services::ObjectKeys;
use crate::utils::DisplayLocale;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid {name}='{value}': {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub storage_base_url: String,
    pub access_prefix: String,
    pub keys: ObjectKeys,
    pub signed_url_expiry: Duration,
    pub locale: DisplayLocale,
    pub chart_width: u32,
    pub chart_height: u32,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup<L>(lookup: L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let storage_base_url =
            get("STORAGE_BASE_URL").ok_or(ConfigError::Missing("STORAGE_BASE_URL"))?;

        let keys = ObjectKeys {
            historical: get("HISTORICAL_DATA_KEY")
                .unwrap_or_else(|| ObjectKeys::DEFAULT_HISTORICAL.to_string()),
            prediction: get("PREDICTION_DATA_KEY")
                .unwrap_or_else(|| ObjectKeys::DEFAULT_PREDICTION.to_string()),
        };

        let expiry_secs = parse_or(
            "SIGNED_URL_EXPIRY_SECS",
            get("SIGNED_URL_EXPIRY_SECS"),
            StorageClient::DEFAULT_EXPIRY.as_secs(),
        )?;
        if expiry_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "SIGNED_URL_EXPIRY_SECS",
                value: "0".to_string(),
                reason: "must be positive".to_string(),
            });
        }

        let locale = match get("CHART_LOCALE") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                name: "CHART_LOCALE",
                value: raw.clone(),
                reason,
            })?,
            None => DisplayLocale::default(),
        };

        Ok(Self {
            storage_base_url,
            access_prefix: get("STORAGE_ACCESS_PREFIX")
                .unwrap_or_else(|| GuestUrlSigner::DEFAULT_ACCESS_PREFIX.to_string()),
            keys,
            signed_url_expiry: Duration::from_secs(expiry_secs),
            locale,
            chart_width: parse_or("CHART_WIDTH", get("CHART_WIDTH"), 1200)?,
            chart_height: parse_or("CHART_HEIGHT", get("CHART_HEIGHT"), 600)?,
            output_dir: get("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("out")),
        })
    }
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}
