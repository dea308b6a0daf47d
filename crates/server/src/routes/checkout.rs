//! Checkout route handlers.
//!
//! The step-up authorization endpoint plus the PayPal order flow it gates.
//! Every `/api/paypal/*` handler takes [`RequireCheckoutAuth`] on top of
//! [`RequireAuth`], so a plain login is never enough to reach the payment
//! provider.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use pixelmart_core::{Price, ProductId};

use crate::db::products::ProductRepository;
use crate::db::purchases::{NewPurchase, PurchaseRepository};
use crate::error::AppError;
use crate::middleware::{RequireAuth, RequireCheckoutAuth, grant_checkout};
use crate::models::PurchaseResponse;
use crate::services::auth::verify_password;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Step-up authorization request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayPalAuthRequest {
    pub admin_password: String,
}

/// Step-up authorization success response.
#[derive(Debug, Serialize)]
pub struct PayPalAuthResponse {
    pub authorized: bool,
}

/// Order creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: i32,
}

/// Order creation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub status: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Authorize this session for checkout with the shared admin secret.
///
/// `POST /api/paypal-auth`
///
/// The secret is verified against the hash derived at startup from
/// configuration; a success stores a time-limited grant in the session.
///
/// # Errors
///
/// Returns 401 with a `requiresPayPalAuth` marker if the secret is wrong.
pub async fn paypal_auth(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(body): Json<PayPalAuthRequest>,
) -> Result<Json<PayPalAuthResponse>, AppError> {
    let authorized = verify_password(&body.admin_password, state.checkout_secret_hash())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !authorized {
        tracing::warn!(user_id = %user.id, "checkout step-up rejected");
        return Err(AppError::CheckoutSecretRejected);
    }

    grant_checkout(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user_id = %user.id, "checkout step-up granted");

    Ok(Json(PayPalAuthResponse { authorized: true }))
}

/// Create a PayPal order for a product.
///
/// `POST /api/paypal/orders`
///
/// # Errors
///
/// Returns 403 with a `requiresPayPalAuth` marker when the session has no
/// valid checkout grant, 404 if the product doesn't exist.
pub async fn create_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    _gate: RequireCheckoutAuth,
    Json(body): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(body.product_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    let order = state
        .paypal()
        .create_order(
            &product.id.to_string(),
            Price::new(product.price, product.currency),
        )
        .await?;

    tracing::info!(
        user_id = %user.id,
        product_id = %product.id,
        order_id = %order.id,
        "paypal order created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id: order.id,
            status: order.status,
        }),
    ))
}

/// Capture an approved PayPal order and record the purchase.
///
/// `POST /api/paypal/orders/{id}/capture`
///
/// The product is identified by the `reference_id` set at order creation.
///
/// # Errors
///
/// Returns 403 with a `requiresPayPalAuth` marker when the session has no
/// valid checkout grant, 502 if the capture did not complete.
pub async fn capture_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    _gate: RequireCheckoutAuth,
    Path(order_id): Path<String>,
) -> Result<Json<PurchaseResponse>, AppError> {
    let captured = state.paypal().capture_order(&order_id).await?;

    if !captured.is_completed() {
        tracing::warn!(order_id = %captured.id, status = %captured.status, "capture not completed");
        return Err(AppError::BadRequest(format!(
            "order capture not completed (status: {})",
            captured.status
        )));
    }

    let product_id: i32 = captured
        .reference_id()
        .and_then(|r| r.parse().ok())
        .ok_or_else(|| AppError::Internal("capture response missing reference id".to_owned()))?;

    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(product_id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_owned()))?;

    let purchase = PurchaseRepository::new(state.pool())
        .create(&NewPurchase {
            buyer_id: user.id,
            product_id: product.id,
            paypal_order_id: &captured.id,
            amount: product.price,
            currency: product.currency,
        })
        .await?;

    tracing::info!(
        user_id = %user.id,
        product_id = %product.id,
        order_id = %captured.id,
        "purchase captured"
    );

    Ok(Json(purchase.into()))
}

/// List the caller's purchases.
///
/// `GET /api/purchases`
///
/// # Errors
///
/// Returns 401 when not logged in.
pub async fn list_purchases(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<PurchaseResponse>>, AppError> {
    let purchases = PurchaseRepository::new(state.pool())
        .list_by_buyer(user.id)
        .await?;

    Ok(Json(purchases.into_iter().map(Into::into).collect()))
}
