//! Request/response types for the generative-language API.
//!
//! These match the `generateContent` wire format: a prompt goes in as
//! content parts, the response schema constrains the output to JSON, and the
//! answer comes back as text inside the first candidate.

use serde::{Deserialize, Serialize};

/// Request body for a `generateContent` call.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerateRequest {
    /// Prompt contents.
    pub contents: Vec<Content>,
    /// Output constraints.
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

/// A content block (role + parts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Content {
    /// "user" for prompts; responses carry "model".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Text parts.
    pub parts: Vec<Part>,
}

/// A single text part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Part {
    /// The text payload.
    pub text: String,
}

/// Output constraints: force schema-conforming JSON.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GenerationConfig {
    /// Always "application/json" here.
    #[serde(rename = "responseMimeType")]
    pub response_mime_type: String,
    /// JSON schema the output must satisfy.
    #[serde(rename = "responseSchema")]
    pub response_schema: serde_json::Value,
}

/// Response body from a `generateContent` call.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenerateResponse {
    /// Generated candidates; the first is the answer.
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt itself was blocked.
    #[serde(rename = "promptFeedback", default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// A generated candidate.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Candidate {
    /// The candidate's content.
    pub content: Option<Content>,
    /// Why generation stopped (e.g. "STOP", "SAFETY").
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

/// Feedback attached when a prompt is refused outright.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PromptFeedback {
    /// Block reason (e.g. "SAFETY").
    #[serde(rename = "blockReason", default)]
    pub block_reason: Option<String>,
}
