//! The two AI flows: description rewriting and catalog search.
//!
//! Each flow builds a prompt and a response schema, makes one call through
//! [`GenAiClient`], and validates the decoded output. Prompt/parse halves
//! are split out as plain functions so they can be tested without a network.

use serde::Deserialize;
use serde_json::json;

use lookbook_core::ProductId;

use crate::models::catalog::Product;

use super::client::GenAiClient;
use super::error::AiError;

// =============================================================================
// Describe flow
// =============================================================================

#[derive(Deserialize)]
struct DescribeOutput {
    description: String,
}

/// Generate an alternative marketing description for a product.
///
/// # Errors
///
/// Fails if the model call fails or the output does not contain a non-empty
/// description. The caller displays the error and may retry by re-invoking.
pub async fn describe_product(
    client: &GenAiClient,
    name: &str,
    description: &str,
    features: Option<&str>,
) -> Result<String, AiError> {
    let prompt = describe_prompt(name, description, features);
    let schema = json!({
        "type": "object",
        "properties": {
            "description": { "type": "string" }
        },
        "required": ["description"]
    });

    let output = client.generate(prompt, schema).await?;
    parse_describe_output(output)
}

fn describe_prompt(name: &str, description: &str, features: Option<&str>) -> String {
    let mut prompt = format!(
        "Write an alternative marketing description for this product.\n\
         Keep it factual, two to three sentences, no emoji.\n\n\
         Name: {name}\nCurrent description: {description}\n"
    );
    if let Some(features) = features {
        prompt.push_str(&format!("Features: {features}\n"));
    }
    prompt
}

fn parse_describe_output(output: serde_json::Value) -> Result<String, AiError> {
    let parsed: DescribeOutput = serde_json::from_value(output)
        .map_err(|e| AiError::Schema(format!("describe output: {e}")))?;

    let description = parsed.description.trim().to_owned();
    if description.is_empty() {
        return Err(AiError::Schema("describe output: empty description".to_owned()));
    }
    Ok(description)
}

// =============================================================================
// Search flow
// =============================================================================

#[derive(Deserialize)]
struct SearchOutput {
    matches: Vec<String>,
}

/// Find catalog products matching a natural-language query.
///
/// The entire catalog snapshot is serialized into the request, which bounds
/// usable scale to one model context window - accepted for this catalog
/// size. Returns product IDs in the model's relevance order, possibly empty;
/// IDs the model invents are dropped.
///
/// # Errors
///
/// Fails if the model call fails or the output shape is wrong.
pub async fn search_products(
    client: &GenAiClient,
    query: &str,
    catalog: &[Product],
) -> Result<Vec<ProductId>, AiError> {
    let prompt = search_prompt(query, catalog);
    let schema = json!({
        "type": "object",
        "properties": {
            "matches": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["matches"]
    });

    let output = client.generate(prompt, schema).await?;
    parse_search_output(output, catalog)
}

fn search_prompt(query: &str, catalog: &[Product]) -> String {
    let listing: Vec<serde_json::Value> = catalog
        .iter()
        .map(|p| {
            json!({
                "id": p.id,
                "name": p.name,
                "description": p.description,
                "category_id": p.category_id,
                "features": p.features,
            })
        })
        .collect();

    format!(
        "You are a product search engine. Given the catalog below and a \
         shopper's query, return the IDs of matching products ordered from \
         most to least relevant. Return an empty list if nothing matches.\n\n\
         Query: {query}\n\nCatalog:\n{}",
        serde_json::Value::Array(listing)
    )
}

/// Validate the model's ID list against the catalog, preserving its order.
fn parse_search_output(
    output: serde_json::Value,
    catalog: &[Product],
) -> Result<Vec<ProductId>, AiError> {
    let parsed: SearchOutput = serde_json::from_value(output)
        .map_err(|e| AiError::Schema(format!("search output: {e}")))?;

    let known: std::collections::HashSet<&str> =
        catalog.iter().map(|p| p.id.as_str()).collect();

    let mut seen = std::collections::HashSet::new();
    Ok(parsed
        .matches
        .into_iter()
        .filter(|id| known.contains(id.as_str()) && seen.insert(id.clone()))
        .map(ProductId::new)
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lookbook_core::{CategoryId, CurrencyCode, Price};

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            description: String::new(),
            price: Price::from_cents(1000, CurrencyCode::USD),
            dealer_price: None,
            category_id: CategoryId::new("c-1"),
            image_url: None,
            features: None,
            created_at: None,
        }
    }

    #[test]
    fn test_parse_describe_output() {
        let output = json!({"description": "A sturdy oak desk."});
        assert_eq!(parse_describe_output(output).unwrap(), "A sturdy oak desk.");
    }

    #[test]
    fn test_parse_describe_output_rejects_empty() {
        assert!(matches!(
            parse_describe_output(json!({"description": "   "})),
            Err(AiError::Schema(_))
        ));
        assert!(matches!(
            parse_describe_output(json!({"text": "wrong key"})),
            Err(AiError::Schema(_))
        ));
    }

    #[test]
    fn test_parse_search_preserves_model_order() {
        let catalog = vec![product("1", "Desk"), product("2", "Lamp"), product("3", "Chair")];
        let output = json!({"matches": ["3", "1"]});

        let ids = parse_search_output(output, &catalog).unwrap();
        assert_eq!(ids, vec![ProductId::new("3"), ProductId::new("1")]);
    }

    #[test]
    fn test_parse_search_drops_unknown_and_duplicate_ids() {
        let catalog = vec![product("1", "Desk")];
        let output = json!({"matches": ["99", "1", "1"]});

        let ids = parse_search_output(output, &catalog).unwrap();
        assert_eq!(ids, vec![ProductId::new("1")]);
    }

    #[test]
    fn test_parse_search_empty_is_ok() {
        let ids = parse_search_output(json!({"matches": []}), &[]).unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn test_search_prompt_contains_catalog_and_query() {
        let catalog = vec![product("1", "Desk")];
        let prompt = search_prompt("something to write on", &catalog);
        assert!(prompt.contains("something to write on"));
        assert!(prompt.contains("Desk"));
    }
}
