//! Product route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use lookbook_core::{CategoryId, Price, ProductId};

use crate::backend::collections;
use crate::error::{AppError, Result};
use crate::models::catalog::Product;
use crate::state::AppState;

/// Product projection served to clients.
///
/// The dealer price is included only for dealer sessions. This gates
/// *display* only - the flag comes from the client-held session, so nothing
/// security-relevant may depend on it.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_price: Option<Price>,
    pub category_id: CategoryId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<String>,
}

/// Project a product for the current viewer.
pub fn project(product: Product, dealer: bool) -> ProductView {
    ProductView {
        id: product.id,
        name: product.name,
        description: product.description,
        price: product.price,
        dealer_price: if dealer { product.dealer_price } else { None },
        category_id: product.category_id,
        image_url: product.image_url,
        features: product.features,
    }
}

/// Whether the current session sees dealer pricing.
pub fn viewer_is_dealer(state: &AppState) -> bool {
    state
        .session()
        .current()
        .is_some_and(|session| session.roles.dealer)
}

/// List all products.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductView>>> {
    let dealer = viewer_is_dealer(&state);
    let products: Vec<Product> = state
        .documents()
        .list(collections::PRODUCTS, Some("name"))
        .await?;

    Ok(Json(
        products.into_iter().map(|p| project(p, dealer)).collect(),
    ))
}

/// Fetch a single product.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>> {
    let dealer = viewer_is_dealer(&state);
    let product: Product = state
        .documents()
        .get(collections::PRODUCTS, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(project(product, dealer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookbook_core::CurrencyCode;

    fn product_with_dealer_price() -> Product {
        Product {
            id: ProductId::new("p-1"),
            name: "Desk".to_owned(),
            description: "Oak desk".to_owned(),
            price: Price::from_cents(19900, CurrencyCode::USD),
            dealer_price: Some(Price::from_cents(14900, CurrencyCode::USD)),
            category_id: CategoryId::new("c-1"),
            image_url: None,
            features: None,
            created_at: None,
        }
    }

    #[test]
    fn test_dealer_price_hidden_from_retail_viewers() {
        let view = project(product_with_dealer_price(), false);
        assert!(view.dealer_price.is_none());
    }

    #[test]
    fn test_dealer_price_shown_to_dealers() {
        let view = project(product_with_dealer_price(), true);
        assert!(view.dealer_price.is_some());
    }
}
