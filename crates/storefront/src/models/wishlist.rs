//! Wishlist entry type.

use serde::{Deserialize, Serialize};

use lookbook_core::{CategoryId, Price, ProductId};

use super::catalog::Product;

/// A saved product snapshot the user wants to revisit.
///
/// The entry copies the product's fields at the time it was wishlisted, so
/// the wishlist renders even if the catalog record later changes or goes
/// away. Entries are keyed by product ID; insertion order is preserved for
/// display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistEntry {
    /// Product document ID (the set key).
    pub id: ProductId,
    /// Product name at the time of wishlisting.
    pub name: String,
    /// Description snapshot.
    #[serde(default)]
    pub description: String,
    /// Price snapshot.
    pub price: Price,
    /// Dealer price snapshot, if the product carried one.
    #[serde(default)]
    pub dealer_price: Option<Price>,
    /// Category reference.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Image URL snapshot.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Feature text snapshot.
    #[serde(default)]
    pub features: Option<String>,
}

impl From<Product> for WishlistEntry {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            dealer_price: product.dealer_price,
            category_id: Some(product.category_id),
            image_url: product.image_url,
            features: product.features,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lookbook_core::CurrencyCode;

    #[test]
    fn test_entry_from_product_copies_snapshot() {
        let product = Product {
            id: ProductId::new("p-1"),
            name: "Lamp".to_owned(),
            description: "Brass lamp".to_owned(),
            price: Price::from_cents(4999, CurrencyCode::USD),
            dealer_price: None,
            category_id: CategoryId::new("c-1"),
            image_url: Some("https://img.example/lamp.jpg".to_owned()),
            features: None,
            created_at: None,
        };

        let entry = WishlistEntry::from(product.clone());
        assert_eq!(entry.id, product.id);
        assert_eq!(entry.name, "Lamp");
        assert_eq!(entry.category_id, Some(CategoryId::new("c-1")));
    }

    #[test]
    fn test_entry_tolerates_minimal_snapshot() {
        // An old persisted entry with only the fields that have always existed.
        let json = r#"{
            "id": "p-2",
            "name": "Chair",
            "price": {"amount": "89.00", "currency_code": "USD"}
        }"#;

        let entry: WishlistEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.description, "");
        assert!(entry.category_id.is_none());
    }
}
