//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//! Responses are JSON `{"message": ...}` bodies; checkout step-up failures
//! additionally carry `"requiresPayPalAuth": true` so clients can branch to
//! a re-auth prompt instead of a dead end.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::paypal::PayPalError;

/// Application-level error type for the marketplace API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// PayPal API operation failed.
    #[error("PayPal error: {0}")]
    PayPal(#[from] PayPalError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Valid session, insufficient privilege.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Checkout secret was wrong (step-up attempt rejected).
    #[error("Checkout authorization rejected")]
    CheckoutSecretRejected,

    /// Payment route used without a valid checkout grant.
    #[error("Checkout authorization required")]
    CheckoutAuthRequired,

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
        if matches!(self, Self::Database(_) | Self::Internal(_) | Self::PayPal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayPal(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                // Duplicate registration is a validation failure on this API
                AuthError::UserAlreadyExists
                | AuthError::WeakPassword(_)
                | AuthError::InvalidUsername(_)
                | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) | Self::CheckoutSecretRejected => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::CheckoutAuthRequired => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::PayPal(_) => "Payment service error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid credentials".to_string(),
                AuthError::UserNotFound => "User not found".to_string(),
                AuthError::UserAlreadyExists => "Username or email already taken".to_string(),
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidUsername(e) => e.to_string(),
                AuthError::InvalidEmail(e) => e.to_string(),
                AuthError::Repository(_) | AuthError::PasswordHash(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::CheckoutSecretRejected => "Invalid admin password".to_string(),
            Self::CheckoutAuthRequired => "PayPal authorization required".to_string(),
            Self::NotFound(what) => format!("{what} not found"),
            Self::Unauthorized(msg) | Self::Forbidden(msg) | Self::BadRequest(msg) => msg.clone(),
        };

        let body = match &self {
            Self::CheckoutSecretRejected | Self::CheckoutAuthRequired => json!({
                "message": message,
                "requiresPayPalAuth": true,
            }),
            _ => json!({ "message": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
