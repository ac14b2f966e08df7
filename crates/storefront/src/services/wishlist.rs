//! Wishlist container.
//!
//! Maintains the set of wishlisted products and keeps it durable under
//! [`keys::WISHLIST`]. The set is keyed by product ID (duplicates are
//! no-ops) with insertion order preserved for display. Persistence is a
//! synchronous local write, so after every `add`/`remove` the in-memory set
//! and the snapshot are identical - there is no eventual-consistency window.
//!
//! The wishlist belongs to the data directory, not to the signed-in account:
//! it survives sign-out and serves guests.

use std::sync::{Arc, RwLock};

use lookbook_core::ProductId;

use crate::models::wishlist::WishlistEntry;
use crate::services::notifications::NotificationSender;
use crate::storage::{SnapshotError, SnapshotStore, keys};

/// The wishlist state container.
///
/// Cheaply cloneable handle; all clones observe the same state.
#[derive(Clone)]
pub struct WishlistService {
    inner: Arc<WishlistServiceInner>,
}

struct WishlistServiceInner {
    store: Arc<dyn SnapshotStore>,
    notifier: Arc<dyn NotificationSender>,
    state: RwLock<WishlistState>,
}

struct WishlistState {
    entries: Vec<WishlistEntry>,
    loading: bool,
}

impl WishlistService {
    /// Create an uninitialized container; `is_loading` starts true.
    #[must_use]
    pub fn new(store: Arc<dyn SnapshotStore>, notifier: Arc<dyn NotificationSender>) -> Self {
        Self {
            inner: Arc::new(WishlistServiceInner {
                store,
                notifier,
                state: RwLock::new(WishlistState {
                    entries: Vec::new(),
                    loading: true,
                }),
            }),
        }
    }

    /// Load persisted entries.
    ///
    /// An absent snapshot yields an empty set, not an error; a malformed one
    /// is discarded with a warning. `is_loading` transitions to false exactly
    /// once; repeat calls are no-ops.
    pub fn initialize(&self) {
        let mut state = self.write_state();
        if !state.loading {
            return;
        }

        state.entries = match self.inner.store.get(keys::WISHLIST) {
            Ok(Some(blob)) => match serde_json::from_str::<Vec<WishlistEntry>>(&blob) {
                Ok(entries) => dedupe_by_id(entries),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed wishlist snapshot");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "could not read wishlist snapshot");
                Vec::new()
            }
        };
        state.loading = false;
    }

    /// True until [`Self::initialize`] has run.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read_state().loading
    }

    /// Current entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> Vec<WishlistEntry> {
        self.read_state().entries.clone()
    }

    /// Whether a product is wishlisted. Pure lookup, no side effects.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.read_state().entries.iter().any(|e| &e.id == product_id)
    }

    /// Insert a product snapshot if not already present.
    ///
    /// Idempotent: adding an already-present product is a no-op (and emits
    /// no duplicate confirmation). Persists synchronously before the
    /// in-memory set changes.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if persistence fails; the set is unchanged.
    pub fn add(&self, entry: WishlistEntry) -> Result<(), SnapshotError> {
        let mut state = self.write_state();
        if state.entries.iter().any(|e| e.id == entry.id) {
            return Ok(());
        }

        let name = entry.name.clone();
        let mut next = state.entries.clone();
        next.push(entry);
        self.persist(&next)?;
        state.entries = next;

        self.inner.notifier.notify(&format!("Added {name} to wishlist"));
        Ok(())
    }

    /// Remove the entry with the given product ID, if present.
    ///
    /// Removing an absent ID leaves the set unchanged but still confirms:
    /// the user asked for a removal and the product is gone either way. The
    /// confirmation names the removed product when its snapshot is still in
    /// memory, or falls back to a generic placeholder.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if persistence fails; the set is unchanged.
    pub fn remove(&self, product_id: &ProductId) -> Result<(), SnapshotError> {
        let mut state = self.write_state();
        let Some(position) = state.entries.iter().position(|e| &e.id == product_id) else {
            drop(state);
            self.inner.notifier.notify("Removed item from wishlist");
            return Ok(());
        };

        let mut next = state.entries.clone();
        let removed = next.remove(position);
        self.persist(&next)?;
        state.entries = next;

        let name = if removed.name.is_empty() {
            "item".to_owned()
        } else {
            removed.name
        };
        self.inner
            .notifier
            .notify(&format!("Removed {name} from wishlist"));
        Ok(())
    }

    fn persist(&self, entries: &[WishlistEntry]) -> Result<(), SnapshotError> {
        let blob = serde_json::to_string(entries).map_err(|e| {
            SnapshotError::Io(std::io::Error::other(format!(
                "wishlist serialization failed: {e}"
            )))
        })?;
        self.inner.store.put(keys::WISHLIST, &blob)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, WishlistState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, WishlistState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Drop later duplicates of the same product ID, keeping first-seen order.
fn dedupe_by_id(entries: Vec<WishlistEntry>) -> Vec<WishlistEntry> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(e.id.clone()))
        .collect()
}
