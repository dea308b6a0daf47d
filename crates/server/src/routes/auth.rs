//! Authentication route handlers.
//!
//! Registration, login, logout, and the current-user lookup. All bodies are
//! JSON; the user object in responses never carries the password hash.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, destroy_session, establish_session};
use crate::models::UserResponse;
use crate::services::auth::{AuthService, Registration};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Simple message response.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new account and log it in.
///
/// `POST /api/register`
///
/// # Errors
///
/// Returns 400 on validation failure or duplicate username/email.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let auth = AuthService::new(state.pool());

    let user = auth
        .register(Registration {
            username: &body.username,
            password: &body.password,
            email: body.email.as_deref(),
            full_name: body.full_name.as_deref(),
        })
        .await?;

    establish_session(&session, user.id)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    set_sentry_user(&user.id, Some(user.username.as_str()));
    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login with username and password.
///
/// `POST /api/login`
///
/// # Errors
///
/// Returns 401 with a generic message whether the username or the password
/// was wrong.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let auth = AuthService::new(state.pool());

    let user = auth.login(&body.username, &body.password).await?;

    establish_session(&session, user.id)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    set_sentry_user(&user.id, Some(user.username.as_str()));
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(user.into()))
}

/// Destroy the session.
///
/// `POST /api/logout`
///
/// Also discards any checkout grant, since it lives in the same session.
///
/// # Errors
///
/// Returns 500 if the session cannot be destroyed.
pub async fn logout(session: Session) -> Result<Json<MessageResponse>, AppError> {
    destroy_session(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    clear_sentry_user();

    Ok(Json(MessageResponse {
        message: "Logged out",
    }))
}

/// Get the currently authenticated user.
///
/// `GET /api/user`
pub async fn current_user(RequireAuth(user): RequireAuth) -> Json<UserResponse> {
    Json(user.into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_camel_case() {
        let body: RegisterRequest = serde_json::from_str(
            r#"{"username":"alice","password":"Secret123!","fullName":"Alice Smith"}"#,
        )
        .unwrap();
        assert_eq!(body.username, "alice");
        assert_eq!(body.full_name.as_deref(), Some("Alice Smith"));
        assert!(body.email.is_none());
    }

    #[test]
    fn test_login_request_shape() {
        let body: LoginRequest =
            serde_json::from_str(r#"{"username":"alice","password":"pw"}"#).unwrap();
        assert_eq!(body.username, "alice");
        assert_eq!(body.password, "pw");
    }
}
