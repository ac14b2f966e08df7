//! Authentication service client.
//!
//! Exchanges credentials with the hosted auth service and assembles the
//! resulting [`Session`] from the matching user record. Implements the
//! [`AuthProvider`] capability the session container is written against, so
//! tests can substitute a scripted double.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use lookbook_core::{Email, Roles, UserId};

use crate::config::BackendConfig;
use crate::models::catalog::UserRecord;
use crate::models::session::Session;
use crate::services::session::AuthProvider;

use super::{BackendError, DocumentClient, collections};

/// Client for the hosted authentication service.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    documents: DocumentClient,
}

/// Successful credential-exchange payload.
#[derive(Deserialize)]
struct AuthUserPayload {
    uid: String,
    email: String,
}

/// Error payload from the auth service.
#[derive(Deserialize)]
struct AuthErrorPayload {
    error: AuthErrorDetail,
}

#[derive(Deserialize)]
struct AuthErrorDetail {
    message: String,
}

impl AuthClient {
    /// Create a new auth client.
    ///
    /// The document client is used to read and create user records alongside
    /// the auth service's identity handling.
    #[must_use]
    pub fn new(config: &BackendConfig, documents: DocumentClient) -> Self {
        let base_url = format!("{}/v1/projects/{}/auth", config.api_host, config.project_id);

        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                base_url,
                api_key: config.api_key.expose_secret().to_owned(),
                documents,
            }),
        }
    }

    /// POST to an auth endpoint and decode the identity payload.
    async fn exchange(
        &self,
        endpoint: &str,
        email: &Email,
        password: &str,
    ) -> Result<AuthUserPayload, BackendError> {
        let response = self
            .inner
            .client
            .post(format!("{}/{endpoint}", self.inner.base_url))
            .header("x-api-key", &self.inner.api_key)
            .json(&json!({ "email": email.as_str(), "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(BackendError::Auth(readable_auth_message(&body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| BackendError::Decode(format!("auth response: {e}")))
    }

    /// Build a [`Session`] for an authenticated identity.
    ///
    /// The user record supplies roles and contact fields; if no record exists
    /// yet the session gets defaults, with the display name derived from the
    /// email local part.
    async fn session_for(&self, payload: AuthUserPayload) -> Result<Session, BackendError> {
        let email = Email::parse(&payload.email)
            .map_err(|e| BackendError::Decode(format!("auth returned invalid email: {e}")))?;
        let id = UserId::new(payload.uid);

        let record: Option<UserRecord> = self
            .inner
            .documents
            .get(collections::USERS, id.as_str())
            .await?;

        Ok(record.map_or_else(
            || Session {
                id: id.clone(),
                email: email.clone(),
                display_name: email.local_part().to_owned(),
                roles: Roles::default(),
                avatar_url: None,
                phone: None,
                address: None,
            },
            |record| Session {
                id: record.id,
                email: record.email,
                display_name: record.display_name,
                roles: record.roles,
                avatar_url: record.avatar_url,
                phone: record.phone,
                address: record.address,
            },
        ))
    }
}

impl AuthProvider for AuthClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Session, BackendError> {
        let payload = self.exchange("sign-in", email, password).await?;
        self.session_for(payload).await
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn sign_up(&self, email: &Email, password: &str) -> Result<Session, BackendError> {
        let payload = self.exchange("sign-up", email, password).await?;
        let session = self.session_for(payload).await?;

        // First sign-up: materialize the user record so roles and contact
        // fields have a durable home.
        let record = UserRecord {
            id: session.id.clone(),
            email: session.email.clone(),
            display_name: session.display_name.clone(),
            roles: session.roles,
            avatar_url: None,
            phone: None,
            address: None,
            push_tokens: Vec::new(),
        };
        self.inner
            .documents
            .create(collections::USERS, session.id.as_str(), &record)
            .await?;

        Ok(session)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self, user_id: &UserId) -> Result<(), BackendError> {
        let response = self
            .inner
            .client
            .post(format!("{}/sign-out", self.inner.base_url))
            .header("x-api-key", &self.inner.api_key)
            .json(&json!({ "uid": user_id.as_str() }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(BackendError::Auth(readable_auth_message(&body)));
        }
        Ok(())
    }
}

/// Map an auth service error body to a message fit for users.
fn readable_auth_message(body: &str) -> String {
    let code = serde_json::from_str::<AuthErrorPayload>(body)
        .map(|p| p.error.message)
        .unwrap_or_default();

    match code.as_str() {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            "Invalid email or password".to_owned()
        }
        "EMAIL_EXISTS" => "An account with this email already exists".to_owned(),
        "USER_DISABLED" => "This account has been disabled".to_owned(),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts, try again later".to_owned(),
        _ => "Authentication failed".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_auth_message_known_codes() {
        let body = r#"{"error": {"message": "INVALID_PASSWORD"}}"#;
        assert_eq!(readable_auth_message(body), "Invalid email or password");

        let body = r#"{"error": {"message": "EMAIL_EXISTS"}}"#;
        assert_eq!(
            readable_auth_message(body),
            "An account with this email already exists"
        );
    }

    #[test]
    fn test_readable_auth_message_unknown_body() {
        assert_eq!(readable_auth_message("garbage"), "Authentication failed");
    }
}
