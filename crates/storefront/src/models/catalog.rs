//! Backend-owned catalog documents.
//!
//! These records are validated at the gateway boundary: required fields are
//! plain, optional fields are `Option` with serde defaults, and any extra
//! fields a document accumulated over time are ignored on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lookbook_core::{CategoryId, Email, FileId, Price, ProductId, Roles, UserId};

/// A product record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Document ID.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Retail price.
    pub price: Price,
    /// Dealer price, shown only to dealer sessions.
    #[serde(default)]
    pub dealer_price: Option<Price>,
    /// Category this product belongs to.
    pub category_id: CategoryId,
    /// Primary image URL in object storage.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Free-text feature highlights.
    #[serde(default)]
    pub features: Option<String>,
    /// When the record was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A category record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Document ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Banner image URL.
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A shared file record (brochures, price lists).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFile {
    /// Document ID.
    pub id: FileId,
    /// Display title.
    pub title: String,
    /// Download URL in object storage.
    pub url: String,
    /// MIME type of the blob.
    #[serde(default)]
    pub content_type: Option<String>,
    /// When the file was uploaded.
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// A user record as stored in the backend.
///
/// Distinct from [`crate::models::session::Session`]: this is the durable
/// document, of which the session is a client-held snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Document ID (matches the auth service UID).
    pub id: UserId,
    /// Email address.
    pub email: Email,
    /// Display name.
    pub display_name: String,
    /// Role flags.
    #[serde(default)]
    pub roles: Roles,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Contact phone number, used for guest order lookup.
    #[serde(default)]
    pub phone: Option<String>,
    /// Shipping address.
    #[serde(default)]
    pub address: Option<String>,
    /// Registered push-notification tokens.
    #[serde(default)]
    pub push_tokens: Vec<String>,
}

/// The singleton site-configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Storefront display name.
    #[serde(default)]
    pub store_name: Option<String>,
    /// Hero banner image URL.
    #[serde(default)]
    pub banner_url: Option<String>,
    /// Contact email shown in the footer.
    #[serde(default)]
    pub contact_email: Option<String>,
    /// Announcement text shown site-wide.
    #[serde(default)]
    pub announcement: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_requires_core_fields() {
        // Missing price must fail at the boundary, not deep in a handler.
        let json = r#"{"id": "p-1", "name": "Desk", "description": "Oak", "category_id": "c-1"}"#;
        assert!(serde_json::from_str::<Product>(json).is_err());
    }

    #[test]
    fn test_product_tolerates_partial_optional_fields() {
        let json = r#"{
            "id": "p-1",
            "name": "Desk",
            "description": "Oak desk",
            "price": {"amount": "199.00", "currency_code": "USD"},
            "category_id": "c-1",
            "legacy_field_nobody_remembers": 42
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.dealer_price.is_none());
        assert!(product.image_url.is_none());
        assert!(product.features.is_none());
    }

    #[test]
    fn test_user_record_defaults() {
        let json = r#"{"id": "u-1", "email": "a@b.com", "display_name": "a"}"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert!(user.push_tokens.is_empty());
        assert!(!user.roles.dealer);
    }

    #[test]
    fn test_site_config_is_fully_optional() {
        let config: SiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
    }
}
