//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding. All route handlers return `Result<T, AppError>`.
//!
//! Taxonomy (matching the storefront's failure semantics): backend/AI
//! failures surface as transient errors with state left unchanged;
//! validation failures reject before any network call; "not found" and empty
//! states are normal responses, not faults. Nothing here is fatal to the
//! process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::ai::AiError;
use crate::backend::BackendError;
use crate::services::session::SessionError;
use crate::storage::SnapshotError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend gateway operation failed.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// AI flow failed.
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// Session container operation failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Local snapshot persistence failed.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Backend(_) | Self::Ai(_) | Self::Snapshot(_) | Self::Internal(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Backend(err) => match err {
                BackendError::Auth(_) => StatusCode::UNAUTHORIZED,
                BackendError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Ai(err) => match err {
                AiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                AiError::Blocked(_) => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Session(err) => match err {
                SessionError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                SessionError::Backend(BackendError::Auth(_)) | SessionError::NotSignedIn => {
                    StatusCode::UNAUTHORIZED
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Snapshot(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Backend(err) => match err {
                BackendError::Auth(msg) => msg.clone(),
                BackendError::RateLimited(_) => "Too many requests, try again shortly".to_string(),
                _ => "External service error".to_string(),
            },
            Self::Ai(err) => match err {
                AiError::Blocked(_) => "The request was declined by the model".to_string(),
                AiError::RateLimited(_) => "Too many requests, try again shortly".to_string(),
                _ => "The AI service is unavailable, try again".to_string(),
            },
            Self::Session(err) => match err {
                SessionError::InvalidEmail(e) => e.to_string(),
                SessionError::Backend(BackendError::Auth(msg)) => msg.clone(),
                SessionError::NotSignedIn => "Sign in to continue".to_string(),
                _ => "Internal server error".to_string(),
            },
            Self::Snapshot(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful sign-in to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on sign-out to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product p-123".to_string());
        assert_eq!(err.to_string(), "Not found: product p-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Backend(BackendError::RateLimited(5))),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_failure_maps_to_unauthorized_with_message() {
        let err = AppError::Backend(BackendError::Auth("Invalid email or password".to_string()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = AppError::Internal("sqlite handle poisoned at /var/lib".to_string());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
