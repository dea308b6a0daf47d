//! Checkout step-up authorization gate.
//!
//! Payment routes require a [`CheckoutGrant`] in the session on top of
//! normal authentication. The grant is issued by `POST /api/paypal-auth`
//! after the admin-password check and carries its own expiry, which is
//! evaluated here on every request. Rejections carry a machine-readable
//! `requiresPayPalAuth` marker so clients can prompt for the secret.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CheckoutGrant, session_keys};

/// Extractor gating payment routes on a valid, unexpired checkout grant.
///
/// # Example
///
/// ```rust,ignore
/// async fn capture(
///     RequireAuth(user): RequireAuth,
///     _gate: RequireCheckoutAuth,
/// ) -> impl IntoResponse { /* ... */ }
/// ```
pub struct RequireCheckoutAuth;

/// Error returned when the checkout gate rejects the request.
pub enum CheckoutRejection {
    /// No grant in the session, or the grant has expired.
    NotAuthorized,
    /// Session machinery failed.
    Internal,
}

impl IntoResponse for CheckoutRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotAuthorized => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "message": "PayPal authorization required",
                    "requiresPayPalAuth": true,
                })),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireCheckoutAuth
where
    S: Send + Sync,
{
    type Rejection = CheckoutRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(CheckoutRejection::Internal)?;

        let grant: Option<CheckoutGrant> = session
            .get(session_keys::CHECKOUT_GRANT)
            .await
            .map_err(|_| CheckoutRejection::Internal)?;

        let Some(grant) = grant else {
            return Err(CheckoutRejection::NotAuthorized);
        };

        if !grant.is_valid(Utc::now()) {
            // Drop the stale grant so the session doesn't accumulate it
            let _ = session
                .remove::<CheckoutGrant>(session_keys::CHECKOUT_GRANT)
                .await;
            return Err(CheckoutRejection::NotAuthorized);
        }

        Ok(Self)
    }
}

/// Store a fresh checkout grant in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn grant_checkout(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CHECKOUT_GRANT, CheckoutGrant::issue(Utc::now()))
        .await
}
