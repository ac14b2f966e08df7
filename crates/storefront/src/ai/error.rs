//! Error types for the generative-language API client.

use thiserror::Error;

/// Errors that can occur when running an AI flow.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The model's output did not match the expected shape.
    #[error("schema error: {0}")]
    Schema(String),

    /// The model refused to answer (safety block).
    #[error("request blocked: {0}")]
    Blocked(String),
}

/// Error response body from the API.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_error_display() {
        let err = AiError::Schema("missing field `description`".to_owned());
        assert_eq!(err.to_string(), "schema error: missing field `description`");

        let err = AiError::Api {
            status: 400,
            message: "Invalid API key".to_owned(),
        };
        assert_eq!(err.to_string(), "API error (400): Invalid API key");
    }

    #[test]
    fn test_api_error_deserialization() {
        let json = r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let response: ApiErrorResponse = serde_json::from_str(json).expect("deserialize");
        assert_eq!(response.error.message, "API key not valid");
    }
}
