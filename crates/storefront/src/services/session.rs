//! Session container.
//!
//! Holds at most one authenticated [`Session`], publishes it through a
//! `tokio::sync::watch` channel, and keeps the persisted snapshot under
//! [`keys::SESSION`] in lockstep with memory. Consumers `state()` for a
//! point-in-time read or `subscribe()` for change notification.
//!
//! Until [`SessionService::initialize`] has run, observers see
//! [`SessionState::Loading`] - "not yet checked" is deliberately distinct
//! from "not signed in".

use std::sync::Arc;

use tokio::sync::watch;

use lookbook_core::{Email, EmailError, UserId};

use crate::backend::BackendError;
use crate::models::session::{ProfilePatch, Session, SessionState};
use crate::storage::{SnapshotError, SnapshotStore, keys};

/// Credential exchange capability.
///
/// Implemented by the gateway's `AuthClient` in production and by scripted
/// doubles in tests. Every method is a single round trip; failures are
/// returned, never retried here.
pub trait AuthProvider: Send + Sync {
    /// Exchange credentials for a session.
    fn sign_in(
        &self,
        email: &Email,
        password: &str,
    ) -> impl Future<Output = Result<Session, BackendError>> + Send;

    /// Register a new account and return its fresh session.
    fn sign_up(
        &self,
        email: &Email,
        password: &str,
    ) -> impl Future<Output = Result<Session, BackendError>> + Send;

    /// Invalidate the user's server-side credentials/tokens.
    fn sign_out(&self, user_id: &UserId) -> impl Future<Output = Result<(), BackendError>> + Send;
}

/// Errors from session container operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Malformed email; no network call was attempted.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The auth service or user-record read failed; prior state is untouched.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The snapshot could not be persisted; prior state is untouched.
    #[error("session snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Operation requires a signed-in session.
    #[error("no session is signed in")]
    NotSignedIn,
}

/// The session state container.
///
/// Cheaply cloneable handle; all clones observe the same state.
#[derive(Clone)]
pub struct SessionService<A> {
    inner: Arc<SessionServiceInner<A>>,
}

struct SessionServiceInner<A> {
    auth: A,
    store: Arc<dyn SnapshotStore>,
    state: watch::Sender<SessionState>,
}

impl<A: AuthProvider> SessionService<A> {
    /// Create an uninitialized container in the `Loading` state.
    #[must_use]
    pub fn new(auth: A, store: Arc<dyn SnapshotStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            inner: Arc::new(SessionServiceInner { auth, store, state }),
        }
    }

    /// Restore the persisted session, if any.
    ///
    /// Leaves the `Loading` state exactly once: a well-formed snapshot
    /// becomes `SignedIn`, anything else (absent, unreadable, malformed)
    /// becomes `Guest`. Calling again after initialization is a no-op.
    pub fn initialize(&self) {
        if !self.inner.state.borrow().is_loading() {
            return;
        }

        let restored = match self.inner.store.get(keys::SESSION) {
            Ok(Some(blob)) => match serde_json::from_str::<Session>(&blob) {
                Ok(session) => Some(session),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed session snapshot");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "could not read session snapshot");
                None
            }
        };

        let next = restored.map_or(SessionState::Guest, SessionState::SignedIn);
        self.inner.state.send_replace(next);
    }

    /// Current state (point-in-time read).
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// The live session, if signed in.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.inner.state.borrow().session().cloned()
    }

    /// Subscribe to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Exchange credentials for a session, replacing any live one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEmail` before any network call for malformed input.
    /// On auth or persistence failure the prior state is left untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        let email = Email::parse(email)?;
        let session = self.inner.auth.sign_in(&email, password).await?;
        self.replace(session.clone())?;
        Ok(session)
    }

    /// Register a new account; on success behaves like `sign_in`.
    ///
    /// # Errors
    ///
    /// Same semantics as [`Self::sign_in`].
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session, SessionError> {
        let email = Email::parse(email)?;
        let session = self.inner.auth.sign_up(&email, password).await?;
        self.replace(session.clone())?;
        Ok(session)
    }

    /// Clear the session and remove the persisted snapshot.
    ///
    /// Idempotent: signing out as a guest is a no-op. The provider
    /// notification is best-effort - local state is cleared even if the
    /// network call fails.
    ///
    /// # Errors
    ///
    /// Returns `Snapshot` if the persisted key cannot be removed.
    pub async fn sign_out(&self) -> Result<(), SessionError> {
        let Some(session) = self.current() else {
            return Ok(());
        };

        if let Err(e) = self.inner.auth.sign_out(&session.id).await {
            tracing::warn!(error = %e, "auth service sign-out failed, clearing local session anyway");
        }

        self.inner.store.remove(keys::SESSION)?;
        self.inner.state.send_replace(SessionState::Guest);
        Ok(())
    }

    /// Merge profile fields into the live session and re-persist.
    ///
    /// No backend round trip happens here: the caller is responsible for
    /// having already saved the fields durably to the user record.
    ///
    /// # Errors
    ///
    /// Returns `NotSignedIn` when no session is live; `Snapshot` if the
    /// merged snapshot cannot be persisted (state left untouched).
    pub fn update_profile(&self, patch: &ProfilePatch) -> Result<Session, SessionError> {
        let mut session = self.current().ok_or(SessionError::NotSignedIn)?;

        if let Some(display_name) = &patch.display_name {
            session.display_name.clone_from(display_name);
        }
        if let Some(avatar_url) = &patch.avatar_url {
            session.avatar_url = Some(avatar_url.clone());
        }
        if let Some(phone) = &patch.phone {
            session.phone = Some(phone.clone());
        }
        if let Some(address) = &patch.address {
            session.address = Some(address.clone());
        }

        self.replace(session.clone())?;
        Ok(session)
    }

    /// Persist then publish. Ordering matters: if the write fails, memory
    /// keeps the prior state and the invariant (memory == snapshot) holds.
    fn replace(&self, session: Session) -> Result<(), SnapshotError> {
        let blob = serde_json::to_string(&session).map_err(|e| {
            SnapshotError::Io(std::io::Error::other(format!(
                "session serialization failed: {e}"
            )))
        })?;
        self.inner.store.put(keys::SESSION, &blob)?;
        self.inner.state.send_replace(SessionState::SignedIn(session));
        Ok(())
    }
}
