//! Signed-URL issuance for private objects

use std::time::Duration;

use chrono::Utc;
use reqwest::Url;

use super::models::{SignedUrl, StorageError};

/// Issues temporary read URLs for object keys
///
/// Credential acquisition lives behind this seam; the client only ever sees
/// the resulting URL.
pub trait UrlSigner: Send + Sync {
    fn sign(&self, key: &str, expires_in: Duration) -> Result<SignedUrl, StorageError>;
}

/// Guest-level URLs: `{base}/{access_prefix}{key}` with an expiry window
///
/// Guest access maps to the `public/` prefix of the bucket. The expiry is
/// carried as `X-Amz-Date`/`X-Amz-Expires` query parameters so the bucket
/// policy (or a fronting proxy) can enforce it.
#[derive(Debug, Clone)]
pub struct GuestUrlSigner {
    base_url: Url,
    access_prefix: String,
}

impl GuestUrlSigner {
    pub const DEFAULT_ACCESS_PREFIX: &'static str = "public/";

    pub fn new(base_url: &str, access_prefix: &str) -> Result<Self, StorageError> {
        // Url::join drops the last path segment unless it ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| StorageError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut access_prefix = access_prefix.trim_matches('/').to_string();
        if !access_prefix.is_empty() {
            access_prefix.push('/');
        }

        Ok(Self {
            base_url,
            access_prefix,
        })
    }
}

impl UrlSigner for GuestUrlSigner {
    fn sign(&self, key: &str, expires_in: Duration) -> Result<SignedUrl, StorageError> {
        let key = key.trim_start_matches('/');
        if key.is_empty() {
            return Err(StorageError::Signing("object key is empty".to_string()));
        }

        let mut url = self
            .base_url
            .join(&format!("{}{}", self.access_prefix, key))
            .map_err(|e| StorageError::InvalidUrl(e.to_string()))?;

        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(expires_in)
            .map_err(|e| StorageError::Signing(format!("expiry out of range: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("X-Amz-Date", &now.format("%Y%m%dT%H%M%SZ").to_string())
            .append_pair("X-Amz-Expires", &expires_in.as_secs().to_string());

        Ok(SignedUrl {
            url,
            expires_at: now + lifetime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_guest_object_url() {
        let signer = GuestUrlSigner::new("https://bucket.s3.sa-east-1.amazonaws.com", "public").unwrap();
        let signed = signer
            .sign("raw/prediccion_dolar.json", Duration::from_secs(900))
            .unwrap();

        assert_eq!(signed.url.path(), "/public/raw/prediccion_dolar.json");
        assert!(signed
            .url
            .query_pairs()
            .any(|(k, v)| k == "X-Amz-Expires" && v == "900"));
        assert!(signed.expires_at > Utc::now());
    }

    #[test]
    fn keeps_base_path_and_allows_empty_prefix() {
        let signer = GuestUrlSigner::new("http://localhost:9000/forecasts", "").unwrap();
        let signed = signer.sign("/raw/dataset_macro.json", Duration::from_secs(60)).unwrap();
        assert_eq!(signed.url.path(), "/forecasts/raw/dataset_macro.json");
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            GuestUrlSigner::new("not a url", "public/"),
            Err(StorageError::InvalidUrl(_))
        ));
        let signer = GuestUrlSigner::new("http://localhost", "public/").unwrap();
        assert!(matches!(
            signer.sign("", Duration::from_secs(60)),
            Err(StorageError::Signing(_))
        ));
    }
}
