//! Admin CRUD route handlers.
//!
//! All handlers require a signed-in session with the administrator role.
//! These forms are thin wrappers over the document gateway: validate, write,
//! return the written record.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use lookbook_core::{CategoryId, Price, ProductId};

use crate::backend::collections;
use crate::error::{AppError, Result};
use crate::models::catalog::{Category, Product, SiteConfig};
use crate::models::session::Session;
use crate::state::AppState;

/// Require a signed-in administrator.
pub fn require_admin(state: &AppState) -> Result<Session> {
    let session = state
        .session()
        .current()
        .ok_or_else(|| AppError::Unauthorized("Sign in to continue".to_owned()))?;
    if !session.roles.administrator {
        return Err(AppError::Forbidden("Administrator role required".to_owned()));
    }
    Ok(session)
}

/// Body for creating or replacing a product.
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub dealer_price: Option<Price>,
    pub category_id: CategoryId,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub features: Option<String>,
}

/// Body for creating or replacing a category.
#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }
    Ok(())
}

fn product_from_body(id: ProductId, body: ProductBody) -> Product {
    Product {
        id,
        name: body.name,
        description: body.description,
        price: body.price,
        dealer_price: body.dealer_price,
        category_id: body.category_id,
        image_url: body.image_url,
        features: body.features,
        created_at: Some(chrono::Utc::now()),
    }
}

/// Create a product under a fresh ID.
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<ProductBody>,
) -> Result<(StatusCode, Json<Product>)> {
    require_admin(&state)?;
    validate_name(&body.name)?;

    let product = product_from_body(ProductId::new(Uuid::new_v4().to_string()), body);
    state
        .documents()
        .create(collections::PRODUCTS, product.id.as_str(), &product)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace an existing product.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Product>> {
    require_admin(&state)?;
    validate_name(&body.name)?;

    // Replacing a record that was never created is a client mistake worth
    // surfacing, unlike reads where absence is a normal state.
    let existing: Option<Product> = state.documents().get(collections::PRODUCTS, &id).await?;
    let Some(existing) = existing else {
        return Err(AppError::NotFound(format!("product {id}")));
    };

    let mut product = product_from_body(ProductId::new(id), body);
    product.created_at = existing.created_at;
    state
        .documents()
        .create(collections::PRODUCTS, product.id.as_str(), &product)
        .await?;

    Ok(Json(product))
}

/// Delete a product and its stored image, if any.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    require_admin(&state)?;

    let existing: Option<Product> = state.documents().get(collections::PRODUCTS, &id).await?;
    state.documents().delete(collections::PRODUCTS, &id).await?;

    // Best-effort image cleanup; an orphaned blob is not worth failing the
    // delete over.
    if let Some(product) = existing
        && product.image_url.is_some()
        && let Err(e) = state.blobs().delete(&format!("products/{id}")).await
    {
        tracing::warn!(product = %id, error = %e, "product image cleanup failed");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Create a category under a fresh ID.
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CategoryBody>,
) -> Result<(StatusCode, Json<Category>)> {
    require_admin(&state)?;
    validate_name(&body.name)?;

    let category = Category {
        id: CategoryId::new(Uuid::new_v4().to_string()),
        name: body.name,
        image_url: body.image_url,
    };
    state
        .documents()
        .create(collections::CATEGORIES, category.id.as_str(), &category)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Replace an existing category.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CategoryBody>,
) -> Result<Json<Category>> {
    require_admin(&state)?;
    validate_name(&body.name)?;

    let category = Category {
        id: CategoryId::new(id),
        name: body.name,
        image_url: body.image_url,
    };
    state
        .documents()
        .create(collections::CATEGORIES, category.id.as_str(), &category)
        .await?;

    Ok(Json(category))
}

/// Delete a category. Products keep their dangling reference; the catalog
/// listing simply shows them uncategorized.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    require_admin(&state)?;
    state
        .documents()
        .delete(collections::CATEGORIES, &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Replace the site-configuration singleton.
pub async fn update_site_config(
    State(state): State<AppState>,
    Json(config): Json<SiteConfig>,
) -> Result<Json<SiteConfig>> {
    require_admin(&state)?;
    state
        .documents()
        .create(collections::SITE_CONFIG, collections::SITE_CONFIG_ID, &config)
        .await?;
    Ok(Json(config))
}
