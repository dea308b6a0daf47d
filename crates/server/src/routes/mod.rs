//! HTTP route handlers for the marketplace API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                          - Liveness check
//! GET    /health/ready                    - Readiness check (database probe)
//!
//! # Auth (strict rate limit)
//! POST   /api/register                    - Create account, establish session
//! POST   /api/login                       - Establish session
//! POST   /api/logout                      - Destroy session
//! GET    /api/user                        - Current user
//! POST   /api/paypal-auth                 - Checkout step-up authorization
//!
//! # Products
//! GET    /api/products                    - List (optional category/sellerId filters)
//! GET    /api/products/{id}               - Detail
//! POST   /api/products                    - Create (seller/admin)
//! PUT    /api/products/{id}               - Update (owner-or-admin)
//! DELETE /api/products/{id}               - Delete (owner-or-admin)
//!
//! # Users
//! GET    /api/users                       - List accounts (admin)
//! GET    /api/users/{id}                  - Public profile
//! PATCH  /api/users/{id}                  - Update profile (owner-or-admin)
//! POST   /api/users/{id}/password         - Change password (owner)
//! GET    /api/users/{id}/products         - Seller's listings
//!
//! # Checkout (requires checkout grant)
//! POST   /api/paypal/orders               - Create PayPal order
//! POST   /api/paypal/orders/{id}/capture  - Capture and record purchase
//! GET    /api/purchases                   - Caller's purchases
//! ```

pub mod auth;
pub mod checkout;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Credential endpoints, behind the strict rate limiter.
fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/paypal-auth", post(checkout::paypal_auth))
        .layer(auth_rate_limiter())
}

/// Product routes.
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
}

/// User profile routes.
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route(
            "/{id}",
            get(users::get_profile).patch(users::update_profile),
        )
        .route("/{id}/password", post(users::change_password))
        .route("/{id}/products", get(users::list_user_products))
}

/// PayPal order routes; each handler is additionally gated on the checkout
/// grant via `RequireCheckoutAuth`.
fn paypal_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(checkout::create_order))
        .route("/orders/{id}/capture", post(checkout::capture_order))
}

/// Create all routes for the marketplace API.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::current_user))
        .route("/purchases", get(checkout::list_purchases))
        .nest("/products", product_routes())
        .nest("/users", user_routes())
        .nest("/paypal", paypal_routes())
        .layer(api_rate_limiter())
        .merge(credential_routes());

    Router::new().nest("/api", api)
}
