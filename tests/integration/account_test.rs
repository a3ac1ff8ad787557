//! Account API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use socialnet::shared::{AccountView, UserProfile};

use crate::common::*;
use crate::{assert_api_error, assert_status};

#[tokio::test]
async fn test_update_profile_fields() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;

    let (name, value) = alice.auth();
    let response = app
        .server
        .put("/api/account/bio")
        .add_header(name, value)
        .json(&json!({ "value": "  Rustacean  " }))
        .await;
    assert_status!(response, StatusCode::OK);
    let view: AccountView = response.json();
    assert_eq!(view.profile.bio, "Rustacean");

    let (name, value) = alice.auth();
    let response = app
        .server
        .put("/api/account/occupation")
        .add_header(name, value)
        .json(&json!({ "value": "   " }))
        .await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_status_set_and_clear() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;

    let (name, value) = alice.auth();
    let response = app
        .server
        .put("/api/account/status")
        .add_header(name, value)
        .json(&json!({ "status": "at the beach" }))
        .await;
    let view: AccountView = response.json();
    assert_eq!(view.profile.status.as_deref(), Some("at the beach"));

    let (name, value) = alice.auth();
    let response = app
        .server
        .put("/api/account/status")
        .add_header(name, value)
        .json(&json!({ "status": "" }))
        .await;
    let view: AccountView = response.json();
    assert_eq!(view.profile.status, None);
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;

    let (name, value) = alice.auth();
    let response = app
        .server
        .put("/api/account/password")
        .add_header(name, value)
        .json(&json!({ "current_password": "not_it_at_all", "new_password": "fresh_password" }))
        .await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);

    let (name, value) = alice.auth();
    let response = app
        .server
        .put("/api/account/password")
        .add_header(name, value)
        .json(&json!({ "current_password": TEST_PASSWORD, "new_password": "fresh_password" }))
        .await;
    assert_status!(response, StatusCode::OK);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "login": "alice", "password": "fresh_password" }))
        .await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_profile_lookup_and_deactivation() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    let (name, value) = bob.auth();
    let response = app.server.get("/api/users/alice").add_header(name, value).await;
    assert_status!(response, StatusCode::OK);
    let profile: UserProfile = response.json();
    assert_eq!(profile.id, alice.id);

    let (name, value) = alice.auth();
    let response = app
        .server
        .post("/api/account/deactivate")
        .add_header(name, value)
        .await;
    assert_status!(response, StatusCode::OK);

    let (name, value) = bob.auth();
    let response = app.server.get("/api/users/alice").add_header(name, value).await;
    assert_api_error!(response, StatusCode::NOT_FOUND);

    // A deactivated account can no longer use its token
    let (name, value) = alice.auth();
    let response = app.server.get("/api/auth/me").add_header(name, value).await;
    assert_api_error!(response, StatusCode::FORBIDDEN);
}

async fn profile_post_count(app: &TestApp, viewer: &TestUser) -> usize {
    let (name, value) = viewer.auth();
    let response = app.server.get("/api/users/alice/posts").add_header(name, value).await;
    assert_status!(response, StatusCode::OK);
    let posts: Vec<serde_json::Value> = response.json();
    posts.len()
}

#[tokio::test]
async fn test_profile_posts_respect_privacy() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let carol = create_test_user(&app, "carol").await;
    befriend(&app, &alice, &bob).await;

    create_post(&app, &alice, "for everyone", "public").await;
    create_post(&app, &alice, "for friends", "friends").await;
    create_post(&app, &alice, "for me", "private").await;

    assert_eq!(profile_post_count(&app, &alice).await, 3);
    assert_eq!(profile_post_count(&app, &bob).await, 2);
    assert_eq!(profile_post_count(&app, &carol).await, 1);
}
