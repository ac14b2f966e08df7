//! Backend gateway.
//!
//! Thin clients over the hosted document database, object storage, and
//! authentication service. Each call is a single request that resolves to a
//! success value or a [`BackendError`] carrying a human-readable message;
//! nothing here retries, batches, or caches. The hosted services themselves
//! are black boxes - this module only speaks their JSON REST surface.

pub mod auth;
pub mod blobs;
pub mod documents;

pub use auth::AuthClient;
pub use blobs::BlobClient;
pub use documents::DocumentClient;

use thiserror::Error;

/// Well-known backend collection names.
pub mod collections {
    /// Product records.
    pub const PRODUCTS: &str = "products";
    /// Category records.
    pub const CATEGORIES: &str = "categories";
    /// Shared file records.
    pub const FILES: &str = "files";
    /// User records.
    pub const USERS: &str = "users";
    /// Singleton site-configuration record lives in this collection
    /// under [`SITE_CONFIG_ID`].
    pub const SITE_CONFIG: &str = "site_config";
    /// Document ID of the singleton site-configuration record.
    pub const SITE_CONFIG_ID: &str = "default";
}

/// Errors from the backend gateway.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned an error status with a message.
    #[error("backend error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable message from the error body.
        message: String,
    },

    /// The authentication service rejected the request.
    #[error("auth error: {0}")]
    Auth(String),

    /// Rate limited by the backend.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A response body could not be decoded into the expected record shape.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Shared status triage for gateway responses.
///
/// Returns the response body as text on success. 429 is mapped to
/// [`BackendError::RateLimited`]; other non-success statuses become
/// [`BackendError::Api`] with the (truncated) body as the message.
pub(crate) async fn read_body(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(1);
        return Err(BackendError::RateLimited(retry_after));
    }

    let body = response.text().await?;

    if !status.is_success() {
        return Err(BackendError::Api {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::RateLimited(30);
        assert_eq!(err.to_string(), "rate limited, retry after 30 seconds");

        let err = BackendError::Api {
            status: 503,
            message: "maintenance".to_owned(),
        };
        assert_eq!(err.to_string(), "backend error (503): maintenance");
    }
}
