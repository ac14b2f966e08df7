//! Category and site-configuration route handlers.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::backend::collections;
use crate::error::Result;
use crate::models::catalog::{Category, Product, SiteConfig};
use crate::state::AppState;

use super::products::{ProductView, project, viewer_is_dealer};

/// List all categories.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories: Vec<Category> = state
        .documents()
        .list(collections::CATEGORIES, Some("name"))
        .await?;
    Ok(Json(categories))
}

/// List the products in one category.
///
/// An unknown category yields an empty list, not an error - "nothing here"
/// is a normal catalog state.
pub async fn products(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ProductView>>> {
    let dealer = viewer_is_dealer(&state);
    let all: Vec<Product> = state
        .documents()
        .list(collections::PRODUCTS, Some("name"))
        .await?;

    Ok(Json(
        all.into_iter()
            .filter(|p| p.category_id.as_str() == id)
            .map(|p| project(p, dealer))
            .collect(),
    ))
}

/// Fetch the site-configuration singleton.
///
/// A missing record serves defaults; the storefront must render before an
/// administrator has ever saved the config.
pub async fn site_config(State(state): State<AppState>) -> Result<Json<SiteConfig>> {
    let config: Option<SiteConfig> = state
        .documents()
        .get(collections::SITE_CONFIG, collections::SITE_CONFIG_ID)
        .await?;
    Ok(Json(config.unwrap_or_default()))
}
