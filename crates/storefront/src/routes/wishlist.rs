//! Wishlist route handlers.
//!
//! Thin glue over the wishlist container: fetch the product snapshot on add,
//! delegate the set semantics (idempotent add, no-op remove) to the
//! container itself.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use lookbook_core::ProductId;

use crate::backend::collections;
use crate::error::{AppError, Result};
use crate::models::catalog::Product;
use crate::models::wishlist::WishlistEntry;
use crate::state::AppState;

/// Body for adding a product to the wishlist.
#[derive(Debug, Deserialize)]
pub struct AddBody {
    pub product_id: String,
}

/// Current wishlist entries in insertion order.
pub async fn index(State(state): State<AppState>) -> Json<Vec<WishlistEntry>> {
    Json(state.wishlist().entries())
}

/// Add a product by ID.
///
/// The full product snapshot is captured at add time so the entry outlives
/// later catalog edits.
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddBody>,
) -> Result<(StatusCode, Json<Vec<WishlistEntry>>)> {
    if body.product_id.trim().is_empty() {
        return Err(AppError::BadRequest("product_id is required".to_owned()));
    }

    let product: Product = state
        .documents()
        .get(collections::PRODUCTS, &body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    state.wishlist().add(WishlistEntry::from(product))?;
    Ok((StatusCode::CREATED, Json(state.wishlist().entries())))
}

/// Remove an entry by product ID. Removing an absent entry succeeds.
pub async fn remove(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<WishlistEntry>>> {
    state.wishlist().remove(&ProductId::new(product_id))?;
    Ok(Json(state.wishlist().entries()))
}
