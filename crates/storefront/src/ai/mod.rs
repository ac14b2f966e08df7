//! AI flows.
//!
//! Two independent request/response operations against a generative-language
//! API: rewriting a product description and natural-language catalog search.
//! Each invocation is one schema-validated round trip - no retries, no
//! batching, no caching. Failures surface to the caller, who may simply
//! invoke again.

mod client;
mod error;
pub mod flows;
mod types;

pub use client::GenAiClient;
pub use error::AiError;
pub use flows::{describe_product, search_products};
