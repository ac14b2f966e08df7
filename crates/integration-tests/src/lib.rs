//! Integration tests for Lookbook.
//!
//! The tests exercise the two state containers end to end against in-memory
//! doubles: [`ScriptedAuth`] stands in for the hosted auth service and
//! [`RecordingSender`] captures user-visible confirmations.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lookbook-integration-tests
//! ```

use std::sync::Mutex;

use lookbook_core::{Email, Roles, UserId};
use lookbook_storefront::backend::BackendError;
use lookbook_storefront::models::session::Session;
use lookbook_storefront::services::notifications::NotificationSender;
use lookbook_storefront::services::session::AuthProvider;

/// Scripted stand-in for the hosted auth service.
pub enum ScriptedAuth {
    /// Accept any credentials, deriving the session from the email.
    AcceptAll,
    /// Accept any credentials and grant the given roles.
    AcceptWithRoles(Roles),
    /// Reject every credential exchange.
    RejectAll,
}

impl ScriptedAuth {
    fn session_for(email: &Email, roles: Roles) -> Session {
        Session {
            id: UserId::new(format!("uid-{}", email.local_part())),
            email: email.clone(),
            display_name: email.local_part().to_owned(),
            roles,
            avatar_url: None,
            phone: None,
            address: None,
        }
    }

    fn exchange(&self, email: &Email) -> Result<Session, BackendError> {
        match self {
            Self::AcceptAll => Ok(Self::session_for(email, Roles::default())),
            Self::AcceptWithRoles(roles) => Ok(Self::session_for(email, *roles)),
            Self::RejectAll => Err(BackendError::Auth("Invalid email or password".to_owned())),
        }
    }
}

impl AuthProvider for ScriptedAuth {
    async fn sign_in(&self, email: &Email, _password: &str) -> Result<Session, BackendError> {
        self.exchange(email)
    }

    async fn sign_up(&self, email: &Email, _password: &str) -> Result<Session, BackendError> {
        self.exchange(email)
    }

    async fn sign_out(&self, _user_id: &UserId) -> Result<(), BackendError> {
        Ok(())
    }
}

/// Notification double that records every message.
#[derive(Default)]
pub struct RecordingSender {
    messages: Mutex<Vec<String>>,
}

impl RecordingSender {
    /// Messages emitted so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl NotificationSender for RecordingSender {
    fn notify(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(message.to_owned());
    }
}
