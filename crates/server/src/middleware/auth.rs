//! Authentication middleware and extractors.
//!
//! The session stores only the numeric user id. Every extractor re-fetches
//! the full user row, so a session is honored only while its user still
//! exists and role changes take effect on the very next request.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use pixelmart_core::{Role, UserId};

use crate::db::users::UserRepository;
use crate::models::{User, session_keys};
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Error returned when a guard rejects the request.
pub enum AuthRejection {
    /// No session, or the session's user no longer exists.
    Unauthenticated,
    /// Authenticated but missing the required role.
    Forbidden(&'static str),
    /// Session or database lookup failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Authentication required" })),
            )
                .into_response(),
            Self::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Json(json!({ "message": message }))).into_response()
            }
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

/// Resolve the session to a live user, if any.
async fn resolve_user(parts: &mut Parts, state: &AppState) -> Result<Option<User>, AuthRejection> {
    // Get the session from extensions (set by SessionManagerLayer)
    let session = parts
        .extensions
        .get::<Session>()
        .ok_or(AuthRejection::Internal)?;

    let user_id: Option<UserId> = session
        .get(session_keys::USER_ID)
        .await
        .map_err(|_| AuthRejection::Internal)?;

    let Some(user_id) = user_id else {
        return Ok(None);
    };

    // Re-fetch the user on every request. A session pointing at a deleted
    // user is invalid; a changed role is honored immediately.
    let user = UserRepository::new(state.pool())
        .get_by_id(user_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to load session user");
            AuthRejection::Internal
        })?;

    Ok(user)
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .await?
            .map(Self)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Extractor that requires an authenticated admin.
///
/// Returns 401 when not logged in and 403 when logged in without the
/// `admin` role.
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            return Err(AuthRejection::Forbidden("Admin access required"));
        }

        Ok(Self(user))
    }
}

/// Establish a logged-in session for a user.
///
/// Cycles the session id first so a pre-login session id is never promoted
/// to an authenticated one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn establish_session(
    session: &Session,
    user_id: UserId,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::USER_ID, user_id).await
}

/// Destroy the session entirely (logout).
///
/// Removes the user id and any checkout grant along with the backing row.
///
/// # Errors
///
/// Returns an error if the session cannot be destroyed.
pub async fn destroy_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
