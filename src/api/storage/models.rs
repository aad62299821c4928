use chrono::{DateTime, Utc};
use reqwest::Url;
use thiserror::Error;

/// Time-limited URL for one private object
#[derive(Debug, Clone, PartialEq)]
pub struct SignedUrl {
    pub url: Url,
    pub expires_at: DateTime<Utc>,
}

/// Errors raised while locating or downloading an object
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// 404, or the bucket answered without the key
    #[error("Not found: {0}")]
    NotFound(String),
    /// 401/403, typically an expired or rejected signature
    #[error("Forbidden ({0}): {1}")]
    Forbidden(u16, String),
    /// 5xx
    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),
    /// Other non-success statuses
    #[error("HTTP error ({0}): {1}")]
    HttpError(u16, String),
    /// Transport failure: DNS, TLS, connection reset, body read
    #[error("Request error: {0}")]
    Request(String),
    #[error("Invalid storage URL: {0}")]
    InvalidUrl(String),
    #[error("Signing failed: {0}")]
    Signing(String),
}
