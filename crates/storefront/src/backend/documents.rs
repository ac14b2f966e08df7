//! Document database client.
//!
//! Create/read/update/delete JSON documents by collection and opaque string
//! ID, plus ordered collection listing. Record shapes are validated at this
//! boundary: responses deserialize into the explicit models in
//! [`crate::models::catalog`], and anything that doesn't fit is a
//! [`BackendError::Decode`], not a panic somewhere downstream.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::BackendConfig;

use super::{BackendError, read_body};

/// Client for the hosted document database.
#[derive(Clone)]
pub struct DocumentClient {
    inner: Arc<DocumentClientInner>,
}

struct DocumentClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Response envelope for collection listings.
#[derive(serde::Deserialize)]
struct ListEnvelope {
    documents: Vec<serde_json::Value>,
}

impl DocumentClient {
    /// Create a new document client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let base_url = format!(
            "{}/v1/projects/{}/collections",
            config.api_host, config.project_id
        );

        Self {
            inner: Arc::new(DocumentClientInner {
                client: reqwest::Client::new(),
                base_url,
                api_key: config.api_key.expose_secret().to_owned(),
            }),
        }
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{collection}/documents/{id}", self.inner.base_url)
    }

    /// Create or replace a document.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the backend rejects it.
    #[instrument(skip(self, document))]
    pub async fn create<T: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .put(self.document_url(collection, id))
            .header("x-api-key", &self.inner.api_key)
            .json(document)
            .send()
            .await?;

        read_body(response).await.map(drop)
    }

    /// Read a document. A missing document is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Decode` if the document exists but does not
    /// match the expected record shape.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<T>, BackendError> {
        let response = self
            .inner
            .client
            .get(self.document_url(collection, id))
            .header("x-api-key", &self.inner.api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = read_body(response).await?;
        let document = serde_json::from_str(&body)
            .map_err(|e| BackendError::Decode(format!("{collection}/{id}: {e}")))?;
        Ok(Some(document))
    }

    /// Merge fields into an existing document.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the backend rejects it.
    #[instrument(skip(self, fields))]
    pub async fn update<T: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        fields: &T,
    ) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .patch(self.document_url(collection, id))
            .header("x-api-key", &self.inner.api_key)
            .json(fields)
            .send()
            .await?;

        read_body(response).await.map(drop)
    }

    /// Delete a document. Deleting a missing document is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the backend rejects it.
    #[instrument(skip(self))]
    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .delete(self.document_url(collection, id))
            .header("x-api-key", &self.inner.api_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }

        read_body(response).await.map(drop)
    }

    /// List every document in a collection, optionally ordered by a field.
    ///
    /// Documents that fail to decode are skipped with a warning rather than
    /// failing the whole listing; one malformed legacy record should not
    /// blank the catalog.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request itself fails.
    #[instrument(skip(self))]
    pub async fn list<T: DeserializeOwned>(
        &self,
        collection: &str,
        order_by: Option<&str>,
    ) -> Result<Vec<T>, BackendError> {
        let url = format!("{}/{collection}/documents", self.inner.base_url);
        let mut request = self
            .inner
            .client
            .get(url)
            .header("x-api-key", &self.inner.api_key);
        if let Some(field) = order_by {
            request = request.query(&[("order_by", field)]);
        }

        let body = read_body(request.send().await?).await?;
        let envelope: ListEnvelope = serde_json::from_str(&body)
            .map_err(|e| BackendError::Decode(format!("{collection} listing: {e}")))?;

        let mut records = Vec::with_capacity(envelope.documents.len());
        for document in envelope.documents {
            match serde_json::from_value::<T>(document) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(collection, error = %e, "skipping malformed document");
                }
            }
        }
        Ok(records)
    }
}
