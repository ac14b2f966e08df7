//! Auth route handlers.
//!
//! Session lifecycle glue: credential exchange goes through the session
//! container, which owns persistence. Profile updates save durable fields to
//! the backend user record first, then merge into the live session.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::backend::collections;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::models::session::{ProfilePatch, Session, SessionState};
use crate::state::AppState;

/// Credentials body for sign-in and sign-up.
#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    pub email: String,
    pub password: String,
}

/// Session state projection.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionStateView {
    Loading,
    Guest,
    SignedIn { session: Session },
}

impl From<SessionState> for SessionStateView {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Loading => Self::Loading,
            SessionState::Guest => Self::Guest,
            SessionState::SignedIn(session) => Self::SignedIn { session },
        }
    }
}

/// Exchange credentials for a session.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<Session>> {
    if body.password.is_empty() {
        return Err(AppError::BadRequest("password is required".to_owned()));
    }

    let session = state.session().sign_in(&body.email, &body.password).await?;
    set_sentry_user(&session.id, Some(session.email.as_str()));
    Ok(Json(session))
}

/// Register a new account and sign it in.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<(StatusCode, Json<Session>)> {
    if body.password.len() < 6 {
        return Err(AppError::BadRequest(
            "password must be at least 6 characters".to_owned(),
        ));
    }

    let session = state.session().sign_up(&body.email, &body.password).await?;
    set_sentry_user(&session.id, Some(session.email.as_str()));
    Ok((StatusCode::CREATED, Json(session)))
}

/// Sign out. Idempotent: succeeds for guests too.
pub async fn sign_out(State(state): State<AppState>) -> Result<StatusCode> {
    state.session().sign_out().await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// Current session state.
pub async fn session(State(state): State<AppState>) -> Json<SessionStateView> {
    Json(state.session().state().into())
}

/// Merge profile fields into the user record and the live session.
pub async fn update_profile(
    State(state): State<AppState>,
    Json(patch): Json<ProfilePatch>,
) -> Result<Json<Session>> {
    let current = state
        .session()
        .current()
        .ok_or_else(|| AppError::Unauthorized("Sign in to continue".to_owned()))?;

    // Durable write first; the container merge assumes it already happened.
    state
        .documents()
        .update(collections::USERS, current.id.as_str(), &patch_fields(&patch))
        .await?;

    let session = state.session().update_profile(&patch)?;
    Ok(Json(session))
}

/// Only the provided fields go into the merge-patch document.
fn patch_fields(patch: &ProfilePatch) -> serde_json::Value {
    let mut fields = serde_json::Map::new();
    if let Some(display_name) = &patch.display_name {
        fields.insert("display_name".to_owned(), display_name.clone().into());
    }
    if let Some(avatar_url) = &patch.avatar_url {
        fields.insert("avatar_url".to_owned(), avatar_url.clone().into());
    }
    if let Some(phone) = &patch.phone {
        fields.insert("phone".to_owned(), phone.clone().into());
    }
    if let Some(address) = &patch.address {
        fields.insert("address".to_owned(), address.clone().into());
    }
    fields.into()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_fields_skips_absent() {
        let patch = ProfilePatch {
            phone: Some("555-0100".to_owned()),
            ..ProfilePatch::default()
        };
        let fields = patch_fields(&patch);
        assert_eq!(fields, serde_json::json!({"phone": "555-0100"}));
    }

    #[test]
    fn test_session_state_view_tags() {
        let view: SessionStateView = SessionState::Guest.into();
        let json = serde_json::to_string(&view).unwrap();
        assert_eq!(json, r#"{"status":"guest"}"#);
    }
}
