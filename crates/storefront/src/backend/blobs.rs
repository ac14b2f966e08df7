//! Object storage client.
//!
//! Upload, download-URL retrieval, and deletion of blobs (product and avatar
//! images, shared files). Paths are opaque slash-separated strings chosen by
//! the caller, e.g. `products/p-1.jpg`.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::BackendConfig;

use super::{BackendError, read_body};

/// Client for the hosted object storage service.
#[derive(Clone)]
pub struct BlobClient {
    inner: Arc<BlobClientInner>,
}

struct BlobClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Response envelope carrying a blob's public URL.
#[derive(serde::Deserialize)]
struct UrlEnvelope {
    url: String,
}

impl BlobClient {
    /// Create a new blob client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let base_url = format!(
            "{}/v1/projects/{}/blobs",
            config.storage_host, config.project_id
        );

        Self {
            inner: Arc::new(BlobClientInner {
                client: reqwest::Client::new(),
                base_url,
                api_key: config.api_key.expose_secret().to_owned(),
            }),
        }
    }

    fn blob_endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.base_url)
    }

    /// Endpoint that resolves a blob path to its public URL.
    fn url_endpoint(&self, path: &str) -> String {
        format!("{}/{path}:url", self.inner.base_url)
    }

    /// Upload a blob and return its public download URL.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the upload fails.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BackendError> {
        let response = self
            .inner
            .client
            .post(self.blob_endpoint(path))
            .header("x-api-key", &self.inner.api_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let body = read_body(response).await?;
        let envelope: UrlEnvelope = serde_json::from_str(&body)
            .map_err(|e| BackendError::Decode(format!("upload response: {e}")))?;
        Ok(envelope.url)
    }

    /// Get the public download URL for an existing blob.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the blob does not exist or the request fails.
    #[instrument(skip(self))]
    pub async fn download_url(&self, path: &str) -> Result<String, BackendError> {
        let response = self
            .inner
            .client
            .get(self.url_endpoint(path))
            .header("x-api-key", &self.inner.api_key)
            .send()
            .await?;

        let body = read_body(response).await?;
        let envelope: UrlEnvelope = serde_json::from_str(&body)
            .map_err(|e| BackendError::Decode(format!("download-url response: {e}")))?;
        Ok(envelope.url)
    }

    /// Delete a blob. Deleting a missing blob is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, path: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .delete(self.blob_endpoint(path))
            .header("x-api-key", &self.inner.api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        read_body(response).await.map(drop)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn client() -> BlobClient {
        BlobClient::new(&BackendConfig {
            project_id: "proj".to_owned(),
            api_host: "https://api.example.com".to_owned(),
            storage_host: "https://storage.example.com".to_owned(),
            api_key: SecretString::from("test_api_key_value"),
        })
    }

    #[test]
    fn test_endpoint_shapes() {
        let client = client();
        assert_eq!(
            client.blob_endpoint("files/f-1"),
            "https://storage.example.com/v1/projects/proj/blobs/files/f-1"
        );
        assert_eq!(
            client.url_endpoint("files/f-1"),
            "https://storage.example.com/v1/projects/proj/blobs/files/f-1:url"
        );
    }

    #[test]
    fn test_url_envelope_decode() {
        let envelope: UrlEnvelope =
            serde_json::from_str(r#"{"url": "https://cdn.example.com/files/f-1"}"#).unwrap();
        assert_eq!(envelope.url, "https://cdn.example.com/files/f-1");

        // A response without the url field is a decode failure, not an
        // empty string.
        assert!(serde_json::from_str::<UrlEnvelope>("{}").is_err());
    }
}
