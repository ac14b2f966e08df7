//! AI flow route handlers.
//!
//! Input validation happens before any model call; flow failures surface as
//! transient errors the client can retry by re-submitting.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::ai::flows;
use crate::backend::collections;
use crate::error::{AppError, Result};
use crate::models::catalog::Product;
use crate::state::AppState;

use super::products::{ProductView, project, viewer_is_dealer};

/// Body for the describe flow.
#[derive(Debug, Deserialize)]
pub struct DescribeBody {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub features: Option<String>,
}

/// Response of the describe flow.
#[derive(Debug, Serialize)]
pub struct DescribeResponse {
    pub description: String,
}

/// Body for the search flow.
#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub query: String,
}

/// Generate an alternative marketing description.
pub async fn describe(
    State(state): State<AppState>,
    Json(body): Json<DescribeBody>,
) -> Result<Json<DescribeResponse>> {
    if body.name.trim().is_empty() || body.description.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and description are required".to_owned(),
        ));
    }

    let description = flows::describe_product(
        state.ai(),
        &body.name,
        &body.description,
        body.features.as_deref(),
    )
    .await?;

    Ok(Json(DescribeResponse { description }))
}

/// Natural-language catalog search.
///
/// The model returns relevance-ordered product IDs; that order is preserved
/// when projecting back to products. An empty result is a normal response.
pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Result<Json<Vec<ProductView>>> {
    if body.query.trim().is_empty() {
        return Err(AppError::BadRequest("query is required".to_owned()));
    }

    let dealer = viewer_is_dealer(&state);
    let catalog: Vec<Product> = state
        .documents()
        .list(collections::PRODUCTS, Some("name"))
        .await?;

    let matches = flows::search_products(state.ai(), &body.query, &catalog).await?;

    let mut by_id: std::collections::HashMap<_, _> =
        catalog.into_iter().map(|p| (p.id.clone(), p)).collect();

    Ok(Json(
        matches
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(|p| project(p, dealer))
            .collect(),
    ))
}
