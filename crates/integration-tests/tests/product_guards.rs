//! End-to-end tests for product CRUD guards.
//!
//! Every mutating product endpoint carries the ownership-or-admin guard -
//! delete included. Skipped unless `TEST_DATABASE_URL` is set.

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use pixelmart_integration_tests::{TestApp, unique_username};

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

async fn make_seller(app: &TestApp, prefix: &str) -> String {
    let username = unique_username(prefix);
    let (cookie, _) = app.register(&username, "Secret123!").await;
    app.set_role(&username, "seller").await;
    cookie
}

async fn create_product(app: &TestApp, cookie: &str) -> Value {
    let (status, _, body) = app
        .request(
            Method::POST,
            "/api/products",
            Some(cookie),
            Some(json!({
                "title": "Icon pack",
                "description": "200 vector icons",
                "price": "19.99",
                "category": "icons",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
    body
}

#[tokio::test]
async fn create_requires_authentication() {
    let app = require_app!();

    let (status, _, _) = app
        .request(
            Method::POST,
            "/api/products",
            None,
            Some(json!({
                "title": "Pack", "description": "d", "price": "1.00", "category": "icons",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_requires_selling_role() {
    let app = require_app!();
    let (cookie, _) = app.register(&unique_username("buyer"), "Secret123!").await;

    let (status, _, _) = app
        .request(
            Method::POST,
            "/api/products",
            Some(&cookie),
            Some(json!({
                "title": "Pack", "description": "d", "price": "1.00", "category": "icons",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn seller_crud_roundtrip() {
    let app = require_app!();
    let cookie = make_seller(&app, "seller").await;

    let product = create_product(&app, &cookie).await;
    let id = product["id"].as_i64().expect("product id");

    // Public read
    let (status, _, body) = app
        .request(Method::GET, &format!("/api/products/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Icon pack");
    assert_eq!(body["price"], "19.99");

    // Owner update
    let (status, _, body) = app
        .request(
            Method::PUT,
            &format!("/api/products/{id}"),
            Some(&cookie),
            Some(json!({ "price": "24.99" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"], "24.99");

    // Owner delete
    let (status, _, _) = app
        .request(Method::DELETE, &format!("/api/products/{id}"), Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = app
        .request(Method::GET, &format!("/api/products/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_guarded_like_update() {
    let app = require_app!();
    let owner = make_seller(&app, "owner").await;
    let other = make_seller(&app, "other").await;

    let product = create_product(&app, &owner).await;
    let id = product["id"].as_i64().expect("product id");

    // Unauthenticated delete: 401, and the product survives
    let (status, _, _) = app
        .request(Method::DELETE, &format!("/api/products/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Another seller can neither update nor delete
    let (status, _, _) = app
        .request(
            Method::PUT,
            &format!("/api/products/{id}"),
            Some(&other),
            Some(json!({ "title": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .request(Method::DELETE, &format!("/api/products/{id}"), Some(&other), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .request(Method::GET, &format!("/api/products/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn admin_can_modify_any_product() {
    let app = require_app!();
    let owner = make_seller(&app, "owned").await;
    let product = create_product(&app, &owner).await;
    let id = product["id"].as_i64().expect("product id");

    let admin_name = unique_username("admin");
    let (admin_cookie, _) = app.register(&admin_name, "Secret123!").await;
    app.set_role(&admin_name, "admin").await;

    let (status, _, _) = app
        .request(
            Method::PUT,
            &format!("/api/products/{id}"),
            Some(&admin_cookie),
            Some(json!({ "title": "Moderated title" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = app
        .request(
            Method::DELETE,
            &format!("/api/products/{id}"),
            Some(&admin_cookie),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn profile_update_is_owner_or_admin() {
    let app = require_app!();
    let (cookie, id) = app.register(&unique_username("prof"), "Secret123!").await;
    let (other_cookie, _) = app.register(&unique_username("intruder"), "Secret123!").await;

    // Owner can update
    let (status, _, body) = app
        .request(
            Method::PATCH,
            &format!("/api/users/{id}"),
            Some(&cookie),
            Some(json!({ "bio": "Digital artist" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bio"], "Digital artist");

    // Someone else cannot
    let (status, _, _) = app
        .request(
            Method::PATCH,
            &format!("/api/users/{id}"),
            Some(&other_cookie),
            Some(json!({ "bio": "Vandalized" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Public profile never exposes the email
    let (status, _, body) = app
        .request(Method::GET, &format!("/api/users/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("email").is_none());
}
