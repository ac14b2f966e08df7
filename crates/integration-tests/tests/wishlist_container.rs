//! Integration tests for the wishlist container.
//!
//! These tests cover durability across container instances (the "reload"
//! path) and the wishlist's independence from the session: it belongs to
//! the data directory, so signing out must not touch it.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use lookbook_core::{CurrencyCode, Price, ProductId};
use lookbook_integration_tests::{RecordingSender, ScriptedAuth};
use lookbook_storefront::models::wishlist::WishlistEntry;
use lookbook_storefront::services::session::SessionService;
use lookbook_storefront::services::wishlist::WishlistService;
use lookbook_storefront::storage::{FileStore, MemoryStore, SnapshotStore, keys};

fn entry(id: &str, name: &str) -> WishlistEntry {
    WishlistEntry {
        id: ProductId::new(id),
        name: name.to_owned(),
        description: format!("{name} description"),
        price: Price::from_cents(2500, CurrencyCode::USD),
        dealer_price: None,
        category_id: None,
        image_url: None,
        features: None,
    }
}

fn wishlist_over(store: Arc<dyn SnapshotStore>) -> (WishlistService, Arc<RecordingSender>) {
    let sender = Arc::new(RecordingSender::default());
    let service = WishlistService::new(store, sender.clone());
    service.initialize();
    (service, sender)
}

// =============================================================================
// Durability across instances
// =============================================================================

#[test]
fn test_entries_survive_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SnapshotStore> = Arc::new(FileStore::new(dir.path()).unwrap());

    let (first, _) = wishlist_over(store.clone());
    first.add(entry("p-1", "Lamp")).unwrap();
    first.add(entry("p-2", "Chair")).unwrap();

    // A fresh container over the same data directory simulates a restart.
    let (second, _) = wishlist_over(store);
    let ids: Vec<_> = second.entries().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![ProductId::new("p-1"), ProductId::new("p-2")]);
    assert!(second.contains(&ProductId::new("p-2")));
}

#[test]
fn test_removal_survives_reload() {
    let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());

    let (first, _) = wishlist_over(store.clone());
    first.add(entry("p-1", "Lamp")).unwrap();
    first.add(entry("p-2", "Chair")).unwrap();
    first.remove(&ProductId::new("p-1")).unwrap();

    let (second, _) = wishlist_over(store);
    let ids: Vec<_> = second.entries().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![ProductId::new("p-2")]);
}

#[test]
fn test_entry_snapshot_fields_survive_reload() {
    let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());

    let (first, _) = wishlist_over(store.clone());
    first.add(entry("p-1", "Lamp")).unwrap();

    let (second, _) = wishlist_over(store);
    let restored = &second.entries()[0];
    assert_eq!(restored.name, "Lamp");
    assert_eq!(restored.description, "Lamp description");
    assert_eq!(restored.price, Price::from_cents(2500, CurrencyCode::USD));
}

// =============================================================================
// Independence from the session
// =============================================================================

#[tokio::test]
async fn test_wishlist_survives_sign_out() {
    // Both containers share one store, as in production.
    let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());

    let session = SessionService::new(ScriptedAuth::AcceptAll, store.clone());
    session.initialize();
    session.sign_in("user@example.com", "pw").await.unwrap();

    let (wishlist, _) = wishlist_over(store.clone());
    wishlist.add(entry("p-1", "Lamp")).unwrap();

    session.sign_out().await.unwrap();

    // Sign-out removes only the session key.
    assert!(store.get(keys::SESSION).unwrap().is_none());
    assert!(store.get(keys::WISHLIST).unwrap().is_some());
    assert!(wishlist.contains(&ProductId::new("p-1")));
}

#[test]
fn test_remove_of_absent_product_confirms_with_placeholder() {
    let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
    let (wishlist, sender) = wishlist_over(store);

    // Nothing was ever added, so the entry snapshot cannot be named.
    wishlist.remove(&ProductId::new("p-gone")).unwrap();

    assert!(wishlist.entries().is_empty());
    assert_eq!(
        sender.messages().last().map(String::as_str),
        Some("Removed item from wishlist")
    );
}

#[test]
fn test_wishlist_serves_guests() {
    let store: Arc<dyn SnapshotStore> = Arc::new(MemoryStore::new());
    let (wishlist, sender) = wishlist_over(store);

    // No session at all; the container works the same.
    wishlist.add(entry("p-1", "Lamp")).unwrap();
    assert_eq!(
        sender.messages().last().map(String::as_str),
        Some("Added Lamp to wishlist")
    );
}
