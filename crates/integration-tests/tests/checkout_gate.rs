//! End-to-end tests for the PayPal step-up authorization gate.
//!
//! Payment routes must refuse a plain login session with a machine-readable
//! `requiresPayPalAuth` marker until `POST /api/paypal-auth` succeeds in that
//! session. Skipped unless `TEST_DATABASE_URL` is set.

use axum::http::{Method, StatusCode};
use serde_json::json;

use pixelmart_integration_tests::{TEST_CHECKOUT_SECRET, TestApp, unique_username};

macro_rules! require_app {
    () => {
        match TestApp::spawn().await {
            Some(app) => app,
            None => {
                eprintln!("TEST_DATABASE_URL not set; skipping");
                return;
            }
        }
    };
}

#[tokio::test]
async fn payment_route_requires_step_up() {
    let app = require_app!();
    let (cookie, _) = app.register(&unique_username("payer"), "Secret123!").await;

    // Logged in but not step-up authorized: 403 with the marker
    let (status, _, body) = app
        .request(
            Method::POST,
            "/api/paypal/orders",
            Some(&cookie),
            Some(json!({ "productId": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["requiresPayPalAuth"], true);

    // Wrong secret: 401 with the marker, gate stays closed
    let (status, _, body) = app
        .request(
            Method::POST,
            "/api/paypal-auth",
            Some(&cookie),
            Some(json!({ "adminPassword": "not-the-secret" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["requiresPayPalAuth"], true);

    let (status, _, _) = app
        .request(
            Method::POST,
            "/api/paypal/orders",
            Some(&cookie),
            Some(json!({ "productId": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Correct secret: authorized
    let (status, _, body) = app
        .request(
            Method::POST,
            "/api/paypal-auth",
            Some(&cookie),
            Some(json!({ "adminPassword": TEST_CHECKOUT_SECRET })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "step-up failed: {body}");
    assert_eq!(body["authorized"], true);

    // Gate now passes; the request proceeds to the product lookup, which
    // 404s for a product that doesn't exist (rather than 403 at the gate)
    let (status, _, body) = app
        .request(
            Method::POST,
            "/api/paypal/orders",
            Some(&cookie),
            Some(json!({ "productId": 2_000_000_000 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "expected lookup 404: {body}");
    assert!(body.get("requiresPayPalAuth").is_none());
}

#[tokio::test]
async fn step_up_requires_login_first() {
    let app = require_app!();

    let (status, _, _) = app
        .request(
            Method::POST,
            "/api/paypal-auth",
            None,
            Some(json!({ "adminPassword": TEST_CHECKOUT_SECRET })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_checkout_grant() {
    let app = require_app!();
    let username = unique_username("revoke");
    let (cookie, _) = app.register(&username, "Secret123!").await;

    let (status, _, _) = app
        .request(
            Method::POST,
            "/api/paypal-auth",
            Some(&cookie),
            Some(json!({ "adminPassword": TEST_CHECKOUT_SECRET })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = app
        .request(Method::POST, "/api/logout", Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    // Fresh login, same user: the step-up grant did not survive the session
    let (status, cookie, _) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": username, "password": "Secret123!" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let cookie = cookie.expect("login sets a session cookie");

    let (status, _, body) = app
        .request(
            Method::POST,
            "/api/paypal/orders",
            Some(&cookie),
            Some(json!({ "productId": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["requiresPayPalAuth"], true);
}

#[tokio::test]
async fn purchases_list_requires_auth() {
    let app = require_app!();

    let (status, _, _) = app.request(Method::GET, "/api/purchases", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (cookie, _) = app.register(&unique_username("buyer2"), "Secret123!").await;
    let (status, _, body) = app
        .request(Method::GET, "/api/purchases", Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().is_some_and(Vec::is_empty));
}
