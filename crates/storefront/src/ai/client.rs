//! Generative-language API client.
//!
//! One method: send a prompt with a response schema, get schema-constrained
//! JSON back. Non-streaming only - both flows are single blocking round
//! trips from the caller's perspective.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::AiConfig;

use super::error::{AiError, ApiErrorResponse};
use super::types::{Content, GenerateRequest, GenerateResponse, GenerationConfig, Part};

const JSON_MIME: &str = "application/json";

/// Generative-language API client.
#[derive(Clone)]
pub struct GenAiClient {
    inner: Arc<GenAiClientInner>,
}

struct GenAiClientInner {
    client: reqwest::Client,
    endpoint: String,
}

impl GenAiClient {
    /// Create a new client.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &AiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(config.api_key.expose_secret())
                .expect("Invalid API key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.api_host, config.model
        );

        Self {
            inner: Arc::new(GenAiClientInner { client, endpoint }),
        }
    }

    /// Send a prompt and decode the schema-constrained JSON answer.
    ///
    /// # Errors
    ///
    /// - `Api`/`RateLimited` for error responses
    /// - `Blocked` when the prompt or candidate was refused for safety
    /// - `Schema` when the answer is empty or not valid JSON
    #[instrument(skip(self, prompt, schema), fields(endpoint = %self.inner.endpoint))]
    pub async fn generate(
        &self,
        prompt: String,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value, AiError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_owned()),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME.to_owned(),
                response_schema: schema,
            },
        };

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(AiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map_or_else(|_| body.chars().take(200).collect(), |e| e.error.message);
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let decoded: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::Schema(format!("unreadable response envelope: {e}")))?;

        if let Some(feedback) = decoded.prompt_feedback
            && let Some(reason) = feedback.block_reason
        {
            return Err(AiError::Blocked(reason));
        }

        let candidate = decoded
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AiError::Schema("no candidates in response".to_owned()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(AiError::Blocked("SAFETY".to_owned()));
        }

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AiError::Schema("empty candidate".to_owned()));
        }

        serde_json::from_str(&text)
            .map_err(|e| AiError::Schema(format!("candidate is not valid JSON: {e}")))
    }
}
