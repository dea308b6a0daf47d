//! End-to-end tests for registration, login, and session lifecycle.
//!
//! Skipped unless `TEST_DATABASE_URL` is set (see crate docs).

use axum::http::{Method, StatusCode};
use serde_json::json;

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

#[tokio::test]
async fn register_login_logout_roundtrip() {
    let app = require_app!();
    let username = unique_username("alice");

    // Register: 201, user object without a password field
    let (status, _, body) = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": username, "password": "Secret123!" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], username.as_str());
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());

    // Wrong password: 401 with a generic message
    let (status, _, body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": username, "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    // Unknown username: same status, same message (no enumeration signal)
    let (status, _, body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": unique_username("ghost"), "password": "Secret123!" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    // Correct credentials: 200 with the user object
    let (status, cookie, body) = app
        .request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({ "username": username, "password": "Secret123!" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], username.as_str());
    assert!(body.get("password").is_none());
    let cookie = cookie.expect("login sets a session cookie");
    let user_id = body["id"].as_i64().expect("login response has id");

    // Same session resolves to the same user
    let (status, _, body) = app
        .request(Method::GET, "/api/user", Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64(), Some(user_id));

    // Logout, then the same cookie no longer authenticates
    let (status, _, _) = app
        .request(Method::POST, "/api/logout", Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = app
        .request(Method::GET, "/api/user", Some(&cookie), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn current_user_requires_session() {
    let app = require_app!();

    let (status, _, body) = app.request(Method::GET, "/api/user", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = require_app!();
    let username = unique_username("dup");

    app.register(&username, "Secret123!").await;

    let (status, _, _) = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": username, "password": "Other456!" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn weak_password_is_rejected() {
    let app = require_app!();

    let (status, _, _) = app
        .request(
            Method::POST,
            "/api/register",
            None,
            Some(json!({ "username": unique_username("weak"), "password": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_listing_is_admin_only() {
    let app = require_app!();
    let (user_cookie, _) = app.register(&unique_username("plain"), "Secret123!").await;

    // Anonymous: 401
    let (status, _, _) = app.request(Method::GET, "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Regular user: 403
    let (status, _, _) = app
        .request(Method::GET, "/api/users", Some(&user_cookie), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin: 200 with a list
    let admin_name = unique_username("boss");
    let (admin_cookie, _) = app.register(&admin_name, "Secret123!").await;
    app.set_role(&admin_name, "admin").await;

    let (status, _, body) = app
        .request(Method::GET, "/api/users", Some(&admin_cookie), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().is_some_and(|users| !users.is_empty()));
}

#[tokio::test]
async fn role_change_takes_effect_without_relogin() {
    let app = require_app!();
    let username = unique_username("rolechg");
    let (cookie, _) = app.register(&username, "Secret123!").await;

    let (_, _, body) = app
        .request(Method::GET, "/api/user", Some(&cookie), None)
        .await;
    assert_eq!(body["role"], "user");

    // Role is re-read from the database on every request
    app.set_role(&username, "seller").await;

    let (_, _, body) = app
        .request(Method::GET, "/api/user", Some(&cookie), None)
        .await;
    assert_eq!(body["role"], "seller");
}
