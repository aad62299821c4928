use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::StatusCode;
use tracing::{debug, warn};

use super::models::StorageError;
use super::signer::UrlSigner;

/// Downloads raw object bytes by key
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError>;
}

#[async_trait]
impl<T: ObjectFetcher + ?Sized> ObjectFetcher for Arc<T> {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        (**self).get_object(key).await
    }
}

/// Object-storage client: sign, then GET over HTTP
pub struct StorageClient {
    http_client: HttpClient,
    signer: Box<dyn UrlSigner>,
    expires_in: Duration,
}

impl StorageClient {
    pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(900);

    pub fn new(signer: Box<dyn UrlSigner>, expires_in: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            signer,
            expires_in,
        }
    }

    /// Map a non-success status to an error, keeping the body for diagnostics
    pub(crate) fn classify_status(key: &str, status: StatusCode, body: String) -> StorageError {
        let code = status.as_u16();
        match code {
            404 => StorageError::NotFound(key.to_string()),
            401 | 403 => {
                // S3 also answers 403 for missing keys when listing is denied
                StorageError::Forbidden(code, body)
            }
            500..=599 => {
                warn!("Storage server error {} for '{}': {}", code, key, body);
                StorageError::ServerError(code, body)
            }
            _ => StorageError::HttpError(code, body),
        }
    }
}

#[async_trait]
impl ObjectFetcher for StorageClient {
    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let signed = self.signer.sign(key, self.expires_in)?;
        debug!("GET {} (signed until {})", signed.url.path(), signed.expires_at);

        let response = self
            .http_client
            .get(signed.url)
            .send()
            .await
            .map_err(|e| StorageError::Request(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::classify_status(key, status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Request(format!("Failed to read body: {}", e)))?;
        debug!("Downloaded {} bytes for '{}'", bytes.len(), key);

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        let key = "raw/dataset_macro.json";
        assert!(matches!(
            StorageClient::classify_status(key, StatusCode::NOT_FOUND, String::new()),
            StorageError::NotFound(k) if k == key
        ));
        assert!(matches!(
            StorageClient::classify_status(key, StatusCode::FORBIDDEN, "Request has expired".into()),
            StorageError::Forbidden(403, _)
        ));
        assert!(matches!(
            StorageClient::classify_status(key, StatusCode::BAD_GATEWAY, String::new()),
            StorageError::ServerError(502, _)
        ));
        assert!(matches!(
            StorageClient::classify_status(key, StatusCode::IM_A_TEAPOT, String::new()),
            StorageError::HttpError(418, _)
        ));
    }
}
