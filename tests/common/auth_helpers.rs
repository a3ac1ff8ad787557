//! Authentication test helpers
//!
//! Provides utilities for creating test users through the signup endpoint
//! and attaching their tokens to requests.

use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue, StatusCode};
use serde_json::json;
use socialnet::backend::auth::AuthResponse;
use socialnet::backend::store::{UserStore, UserUpdate};
use socialnet::shared::Role;
use uuid::Uuid;

use super::app::TestApp;

pub const TEST_PASSWORD: &str = "test_password_123";

/// A signed-up user and their token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

impl TestUser {
    pub fn auth(&self) -> (HeaderName, HeaderValue) {
        auth_header(&self.token)
    }
}

/// Create authorization header
pub fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
    let value = HeaderValue::from_str(&format!("Bearer {}", token)).expect("valid header");
    (AUTHORIZATION, value)
}

pub fn signup_body(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{}@example.com", username),
        "password": TEST_PASSWORD,
        "first_name": "Test",
        "last_name": "User",
        "occupation": "Tester",
        "bio": "Writing tests",
        "profile_picture": format!("{}.png", username),
    })
}

/// Sign a user up through the API
pub async fn create_test_user(app: &TestApp, username: &str) -> TestUser {
    let response = app.server.post("/api/auth/signup").json(&signup_body(username)).await;
    assert_eq!(response.status_code(), StatusCode::OK, "signup failed: {}", response.text());

    let body: AuthResponse = response.json();
    TestUser {
        id: body.user.profile.id,
        username: body.user.profile.username,
        token: body.token,
    }
}

pub async fn make_admin(app: &TestApp, user: &TestUser) {
    app.store
        .update_user(user.id, UserUpdate::Role(Role::Admin))
        .await
        .expect("promote to admin");
}

/// Send and accept a friend request between two users
pub async fn befriend(app: &TestApp, a: &TestUser, b: &TestUser) {
    let (name, value) = a.auth();
    let response = app
        .server
        .post("/api/friends/requests")
        .add_header(name, value)
        .json(&json!({ "user_id": b.id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "request failed: {}", response.text());

    let (name, value) = b.auth();
    let response = app
        .server
        .post(&format!("/api/friends/requests/{}/accept", a.id))
        .add_header(name, value)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "accept failed: {}", response.text());
}

/// Create a post and return its id
pub async fn create_post(app: &TestApp, user: &TestUser, content: &str, privacy: &str) -> Uuid {
    let (name, value) = user.auth();
    let response = app
        .server
        .post("/api/posts")
        .add_header(name, value)
        .json(&json!({ "content": content, "privacy": privacy }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "post failed: {}", response.text());

    let body: serde_json::Value = response.json();
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .expect("post id")
}
