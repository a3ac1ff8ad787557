//! Administration API integration tests

use assert_matches::assert_matches;
use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use socialnet::backend::store::{Counters, UserStore};
use socialnet::shared::{AccountView, Role};

use crate::common::*;
use crate::{assert_api_error, assert_ok, assert_status};

#[tokio::test]
async fn test_non_admin_is_forbidden() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    let (name, value) = alice.auth();
    let response = app
        .server
        .post(&format!("/api/admin/users/{}/deactivate", bob.id))
        .add_header(name, value)
        .await;
    assert_api_error!(response, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_deactivate_blocks_login() {
    let app = spawn_app();
    let root = create_test_user(&app, "root").await;
    let bob = create_test_user(&app, "bob").await;
    make_admin(&app, &root).await;

    let (name, value) = root.auth();
    let response = app
        .server
        .post(&format!("/api/admin/users/{}/deactivate", bob.id))
        .add_header(name, value)
        .await;
    assert_status!(response, StatusCode::OK);
    let view: AccountView = response.json();
    assert!(view.deactivated);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "login": "bob", "password": TEST_PASSWORD }))
        .await;
    assert_api_error!(response, StatusCode::FORBIDDEN);

    let (name, value) = root.auth();
    let response = app
        .server
        .post(&format!("/api/admin/users/{}/reactivate", bob.id))
        .add_header(name, value)
        .await;
    assert_status!(response, StatusCode::OK);

    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({ "login": "bob", "password": TEST_PASSWORD }))
        .await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_set_role() {
    let app = spawn_app();
    let root = create_test_user(&app, "root").await;
    let bob = create_test_user(&app, "bob").await;
    make_admin(&app, &root).await;

    let (name, value) = root.auth();
    let response = app
        .server
        .put(&format!("/api/admin/users/{}/role", bob.id))
        .add_header(name, value)
        .json(&json!({ "role": "admin" }))
        .await;
    assert_status!(response, StatusCode::OK);

    let stored = assert_ok!(app.store.user_by_id(bob.id).await);
    assert_matches!(stored, Some(user) if user.role == Role::Admin);

    let (name, value) = root.auth();
    let response = app
        .server
        .put(&format!("/api/admin/users/{}/role", root.id))
        .add_header(name, value)
        .json(&json!({ "role": "user" }))
        .await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reconcile_counters() {
    let app = spawn_app();
    let root = create_test_user(&app, "root").await;
    let bob = create_test_user(&app, "bob").await;
    make_admin(&app, &root).await;
    befriend(&app, &root, &bob).await;
    create_post(&app, &bob, "counted", "public").await;

    assert_ok!(
        app.store
            .set_counters(
                bob.id,
                Counters {
                    post_count: 11,
                    friend_count: 0,
                    activity: 3,
                },
            )
            .await
    );

    let (name, value) = root.auth();
    let response = app
        .server
        .post(&format!("/api/admin/users/{}/reconcile", bob.id))
        .add_header(name, value)
        .await;
    assert_status!(response, StatusCode::OK);
    let counters: Counters = response.json();
    assert_eq!(
        counters,
        Counters {
            post_count: 1,
            friend_count: 1,
            activity: 0,
        }
    );
}
