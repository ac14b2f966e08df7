//! Account route handlers: guest phone lookup and push-token registration.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use lookbook_core::UserId;

use crate::backend::collections;
use crate::error::{AppError, Result};
use crate::models::catalog::UserRecord;
use crate::state::AppState;

/// Public projection of a user record for guest lookup.
///
/// Deliberately excludes email, address, and roles - a phone number alone
/// should not unlock the whole record.
#[derive(Debug, Serialize)]
pub struct UserLookupView {
    pub id: UserId,
    pub display_name: String,
    pub phone: Option<String>,
}

/// Body for registering a push token.
#[derive(Debug, Deserialize)]
pub struct TokenBody {
    pub token: String,
}

/// Look up a user record by phone number.
///
/// Lets a guest on a shared device find their account without signing in.
/// Comparison ignores everything but digits, so "555-0100" matches
/// "5550100".
pub async fn by_phone(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<UserLookupView>> {
    let wanted = digits(&phone);
    if wanted.is_empty() {
        return Err(AppError::BadRequest("phone number is required".to_owned()));
    }

    let users: Vec<UserRecord> = state
        .documents()
        .list(collections::USERS, None)
        .await?;

    users
        .into_iter()
        .find(|u| u.phone.as_deref().is_some_and(|p| digits(p) == wanted))
        .map(|u| {
            Json(UserLookupView {
                id: u.id,
                display_name: u.display_name,
                phone: u.phone,
            })
        })
        .ok_or_else(|| AppError::NotFound("no account with that phone number".to_owned()))
}

/// Register a push-notification token on the signed-in user's record.
///
/// Idempotent: re-registering a known token is a no-op.
pub async fn register_token(
    State(state): State<AppState>,
    Json(body): Json<TokenBody>,
) -> Result<StatusCode> {
    let session = state
        .session()
        .current()
        .ok_or_else(|| AppError::Unauthorized("Sign in to continue".to_owned()))?;
    if body.token.trim().is_empty() {
        return Err(AppError::BadRequest("token is required".to_owned()));
    }

    let record: Option<UserRecord> = state
        .documents()
        .get(collections::USERS, session.id.as_str())
        .await?;
    let mut tokens = record.map(|r| r.push_tokens).unwrap_or_default();

    if !tokens.contains(&body.token) {
        tokens.push(body.token);
        state
            .documents()
            .update(
                collections::USERS,
                session.id.as_str(),
                &json!({ "push_tokens": tokens }),
            )
            .await?;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Keep only ASCII digits.
fn digits(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_normalization() {
        assert_eq!(digits("(555) 010-0"), "5550100");
        assert_eq!(digits("+1 555.0100"), "15550100");
        assert_eq!(digits("no digits"), "");
    }
}
