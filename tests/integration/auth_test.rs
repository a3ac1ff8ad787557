//! Authentication API integration tests
//!
//! Tests for signup, verification, login, password reset and the
//! current-user endpoint.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use socialnet::backend::auth::AuthResponse;
use socialnet::backend::store::UserStore;

use crate::common::*;
use crate::{assert_api_error, assert_contains, assert_ok, assert_status};

#[tokio::test]
async fn test_health_reports_store() {
    let app = spawn_app();

    let response = app.server.get("/health").await;
    assert_status!(response, StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = spawn_app();

    let response = app.server.get("/api/nope").await;
    assert_api_error!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_signup_success() {
    let app = spawn_app();

    let response = app.server.post("/api/auth/signup").json(&signup_body("alice")).await;
    assert_status!(response, StatusCode::OK);

    let body: AuthResponse = response.json();
    assert!(!body.token.is_empty());
    assert_eq!(body.user.profile.username, "alice");
    assert_eq!(body.user.email, "alice@example.com");
    assert_eq!(body.user.profile.post_count, 0);
}

#[tokio::test]
async fn test_signup_validation() {
    let app = spawn_app();

    let mut body = signup_body("alice");
    body["password"] = json!("short");
    let response = app.server.post("/api/auth/signup").json(&body).await;
    let message = assert_api_error!(response, StatusCode::BAD_REQUEST);
    assert_contains!(message, "8 characters");

    let mut body = signup_body("alice");
    body["first_name"] = json!("R2D2");
    let response = app.server.post("/api/auth/signup").json(&body).await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);

    let response = app.server.post("/api/auth/signup").json(&signup_body("9lives")).await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signup_duplicates_conflict() {
    let app = spawn_app();
    create_test_user(&app, "alice").await;

    let response = app.server.post("/api/auth/signup").json(&signup_body("alice")).await;
    assert_api_error!(response, StatusCode::CONFLICT);

    let mut body = signup_body("alice2");
    body["email"] = json!("alice@example.com");
    let response = app.server.post("/api/auth/signup").json(&body).await;
    let message = assert_api_error!(response, StatusCode::CONFLICT);
    assert_contains!(message, "Email");
}

#[tokio::test]
async fn test_verification_gate() {
    let config = socialnet::backend::server::AppConfig::builder()
        .bcrypt_cost(4)
        .build()
        .unwrap();
    let app = spawn_app_with(config);

    app.server.post("/api/auth/signup").json(&signup_body("carol")).await;

    let login = json!({ "login": "carol", "password": TEST_PASSWORD });
    let response = app.server.post("/api/auth/login").json(&login).await;
    assert_api_error!(response, StatusCode::FORBIDDEN);

    let user = assert_ok!(app.store.user_by_username("carol").await).unwrap();
    let token = user.verification_token.unwrap();

    let response = app.server.get("/api/auth/verify/not-a-token").await;
    assert_api_error!(response, StatusCode::NOT_FOUND);

    let response = app.server.get(&format!("/api/auth/verify/{}", token)).await;
    assert_status!(response, StatusCode::OK);

    let response = app.server.post("/api/auth/login").json(&login).await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_login_and_me() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "login": "alice@example.com", "password": TEST_PASSWORD }))
        .await;
    assert_status!(response, StatusCode::OK);
    let body: AuthResponse = response.json();

    let (name, value) = auth_header(&body.token);
    let response = app.server.get("/api/auth/me").add_header(name, value).await;
    assert_status!(response, StatusCode::OK);
    let me: serde_json::Value = response.json();
    assert_eq!(me["id"], alice.id.to_string());
    assert_eq!(me["email"], "alice@example.com");
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = spawn_app();
    create_test_user(&app, "alice").await;

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "login": "alice", "password": "wrong_password" }))
        .await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = spawn_app();

    let response = app.server.get("/api/auth/me").await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);

    let (name, value) = auth_header("garbage");
    let response = app.server.get("/api/auth/me").add_header(name, value).await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;

    let response = app
        .server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;
    assert_status!(response, StatusCode::OK);

    let response = app
        .server
        .post("/api/auth/forgot-password")
        .json(&json!({ "email": "alice@example.com" }))
        .await;
    assert_status!(response, StatusCode::OK);

    let token = assert_ok!(app.store.user_by_id(alice.id).await)
        .and_then(|u| u.reset_token)
        .expect("reset token issued");

    let response = app
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": token, "password": "a_new_password" }))
        .await;
    assert_status!(response, StatusCode::OK);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "login": "alice", "password": "a_new_password" }))
        .await;
    assert_status!(response, StatusCode::OK);

    let response = app
        .server
        .post("/api/auth/reset-password")
        .json(&json!({ "token": token, "password": "another_password" }))
        .await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);
}
