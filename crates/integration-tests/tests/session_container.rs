//! Integration tests for the session container.
//!
//! These tests exercise the full sign-in/sign-out lifecycle against a
//! scripted auth double and an in-memory snapshot store, including the
//! "reload" path: a second container instance over the same store must
//! restore exactly the state the first one persisted.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use lookbook_core::Roles;
use lookbook_integration_tests::ScriptedAuth;
use lookbook_storefront::models::session::{ProfilePatch, SessionState};
use lookbook_storefront::services::session::{SessionError, SessionService};
use lookbook_storefront::storage::{FileStore, MemoryStore, SnapshotStore, keys};

fn memory_service(auth: ScriptedAuth) -> (SessionService<ScriptedAuth>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let service = SessionService::new(auth, store.clone());
    service.initialize();
    (service, store)
}

// =============================================================================
// Initialization
// =============================================================================

#[test]
fn test_starts_loading_then_guest_when_store_empty() {
    let store = Arc::new(MemoryStore::new());
    let service = SessionService::new(ScriptedAuth::AcceptAll, store);

    assert!(service.state().is_loading());
    service.initialize();
    assert!(matches!(service.state(), SessionState::Guest));
}

#[test]
fn test_initialize_is_idempotent() {
    let (service, _) = memory_service(ScriptedAuth::AcceptAll);
    assert!(matches!(service.state(), SessionState::Guest));

    // Repeat calls must not re-enter Loading or reread the store.
    service.initialize();
    assert!(matches!(service.state(), SessionState::Guest));
}

#[test]
fn test_malformed_snapshot_becomes_guest() {
    let store = Arc::new(MemoryStore::with_entries([(keys::SESSION, "{not json")]));
    let service = SessionService::new(ScriptedAuth::AcceptAll, store);
    service.initialize();
    assert!(matches!(service.state(), SessionState::Guest));
}

// =============================================================================
// Sign-in / Sign-up
// =============================================================================

#[tokio::test]
async fn test_sign_in_derives_display_name_from_email() {
    let (service, _) = memory_service(ScriptedAuth::AcceptAll);

    let session = service.sign_in("user@example.com", "hunter22").await.unwrap();
    assert_eq!(session.display_name, "user");
    assert_eq!(session.email.as_ref(), "user@example.com");
    assert_eq!(service.current().unwrap().id, session.id);
}

#[tokio::test]
async fn test_sign_in_rejects_malformed_email_before_exchange() {
    // RejectAll would fail any exchange; the email check must short-circuit
    // with a distinct error first.
    let (service, _) = memory_service(ScriptedAuth::RejectAll);

    let err = service.sign_in("not-an-email", "pw").await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidEmail(_)));
}

#[tokio::test]
async fn test_failed_sign_in_leaves_prior_state() {
    let store = Arc::new(MemoryStore::new());
    let first = SessionService::new(ScriptedAuth::AcceptAll, store.clone());
    first.initialize();
    first.sign_in("keep@example.com", "pw").await.unwrap();

    let second = SessionService::new(ScriptedAuth::RejectAll, store.clone());
    second.initialize();
    let err = second.sign_in("other@example.com", "bad").await.unwrap_err();
    assert!(matches!(err, SessionError::Backend(_)));

    // The rejected attempt must not disturb the restored session.
    assert_eq!(
        second.current().unwrap().email.as_ref(),
        "keep@example.com"
    );
    assert!(store.get(keys::SESSION).unwrap().unwrap().contains("keep@example.com"));
}

#[tokio::test]
async fn test_sign_up_behaves_like_sign_in_on_success() {
    let (service, store) = memory_service(ScriptedAuth::AcceptAll);

    let session = service.sign_up("fresh@example.com", "pw123456").await.unwrap();
    assert_eq!(session.display_name, "fresh");
    assert!(store.get(keys::SESSION).unwrap().is_some());
}

#[tokio::test]
async fn test_sign_in_carries_granted_roles() {
    let roles = Roles {
        administrator: false,
        dealer: true,
    };
    let (service, _) = memory_service(ScriptedAuth::AcceptWithRoles(roles));

    let session = service.sign_in("dealer@example.com", "pw").await.unwrap();
    assert!(session.roles.dealer);
    assert!(!session.roles.administrator);
}

// =============================================================================
// Reload round trip
// =============================================================================

#[tokio::test]
async fn test_session_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SnapshotStore> = Arc::new(FileStore::new(dir.path()).unwrap());

    let first = SessionService::new(ScriptedAuth::AcceptAll, store.clone());
    first.initialize();
    let signed_in = first.sign_in("user@example.com", "pw").await.unwrap();

    // A fresh container over the same data directory simulates a restart.
    let second = SessionService::new(ScriptedAuth::AcceptAll, store);
    second.initialize();

    let restored = second.current().unwrap();
    assert_eq!(restored.id, signed_in.id);
    assert_eq!(restored.email, signed_in.email);
    assert_eq!(restored.display_name, signed_in.display_name);
}

// =============================================================================
// Sign-out
// =============================================================================

#[tokio::test]
async fn test_sign_out_clears_state_and_snapshot() {
    let (service, store) = memory_service(ScriptedAuth::AcceptAll);
    service.sign_in("user@example.com", "pw").await.unwrap();

    service.sign_out().await.unwrap();
    assert!(matches!(service.state(), SessionState::Guest));
    assert!(store.get(keys::SESSION).unwrap().is_none());
}

#[tokio::test]
async fn test_sign_out_as_guest_is_noop() {
    let (service, _) = memory_service(ScriptedAuth::AcceptAll);
    service.sign_out().await.unwrap();
    service.sign_out().await.unwrap();
    assert!(matches!(service.state(), SessionState::Guest));
}

// =============================================================================
// Profile updates
// =============================================================================

#[tokio::test]
async fn test_update_profile_merges_and_persists() {
    let (service, store) = memory_service(ScriptedAuth::AcceptAll);
    service.sign_in("user@example.com", "pw").await.unwrap();

    let updated = service
        .update_profile(&ProfilePatch {
            display_name: Some("June".to_owned()),
            avatar_url: None,
            phone: Some("555-0100".to_owned()),
            address: None,
        })
        .unwrap();

    assert_eq!(updated.display_name, "June");
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    // Untouched fields carry through the merge.
    assert_eq!(updated.email.as_ref(), "user@example.com");

    let blob = store.get(keys::SESSION).unwrap().unwrap();
    assert!(blob.contains("June"));
    assert!(blob.contains("555-0100"));
}

#[test]
fn test_update_profile_requires_session() {
    let (service, _) = memory_service(ScriptedAuth::AcceptAll);
    let err = service
        .update_profile(&ProfilePatch {
            display_name: Some("Nobody".to_owned()),
            avatar_url: None,
            phone: None,
            address: None,
        })
        .unwrap_err();
    assert!(matches!(err, SessionError::NotSignedIn));
}

// =============================================================================
// Change notification
// =============================================================================

#[tokio::test]
async fn test_subscribers_observe_transitions() {
    let (service, _) = memory_service(ScriptedAuth::AcceptAll);
    let mut rx = service.subscribe();

    service.sign_in("user@example.com", "pw").await.unwrap();
    rx.changed().await.unwrap();
    assert!(matches!(*rx.borrow(), SessionState::SignedIn(_)));

    service.sign_out().await.unwrap();
    rx.changed().await.unwrap();
    assert!(matches!(*rx.borrow(), SessionState::Guest));
}
