//! Session types.
//!
//! A [`Session`] is the in-memory representation of the authenticated user;
//! at most one is live per data directory at a time. It is persisted as a
//! serialized snapshot under [`crate::storage::keys::SESSION`].

use serde::{Deserialize, Serialize};

use lookbook_core::{Email, Roles, UserId};

/// The authenticated user's session.
///
/// Created on successful sign-in, replaced on profile update, destroyed on
/// sign-out. Optional fields may be absent in older persisted snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Backend user record ID.
    pub id: UserId,
    /// The user's email address.
    pub email: Email,
    /// Display name; defaults to the email local part on sign-up.
    pub display_name: String,
    /// Role flags (administrator, dealer).
    #[serde(default)]
    pub roles: Roles,
    /// Avatar image URL, if one was uploaded.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Shipping address.
    #[serde(default)]
    pub address: Option<String>,
}

/// Fields that can be merged into a live session by `update_profile`.
///
/// `None` means "leave unchanged"; the caller has already saved the new
/// values durably to the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    /// New display name.
    pub display_name: Option<String>,
    /// New avatar URL.
    pub avatar_url: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New shipping address.
    pub address: Option<String>,
}

/// Observable state of the session container.
///
/// `Loading` is distinct from `Guest`: it means the persisted snapshot has
/// not been checked yet, and is observable exactly until `initialize`
/// completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup: persisted snapshot not yet read.
    Loading,
    /// No authenticated session.
    Guest,
    /// A user is signed in.
    SignedIn(Session),
}

impl SessionState {
    /// The live session, if signed in.
    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        match self {
            Self::SignedIn(session) => Some(session),
            Self::Loading | Self::Guest => None,
        }
    }

    /// True while the persisted snapshot has not been checked.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_tolerates_absent_optional_fields() {
        // A snapshot written before roles/contact fields existed.
        let json = r#"{
            "id": "u-1",
            "email": "user@example.com",
            "display_name": "user"
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.display_name, "user");
        assert_eq!(session.roles, Roles::default());
        assert!(session.avatar_url.is_none());
        assert!(session.phone.is_none());
    }

    #[test]
    fn test_state_accessors() {
        assert!(SessionState::Loading.is_loading());
        assert!(!SessionState::Guest.is_loading());
        assert!(SessionState::Guest.session().is_none());
    }
}
