//! Direct message API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use socialnet::shared::messaging::ConversationSummary;
use socialnet::shared::{DirectMessage, MessageStatus};

use crate::common::*;
use crate::{assert_api_error, assert_status};

async fn send(
    app: &TestApp,
    from: &TestUser,
    to: &TestUser,
    body: &str,
) -> axum_test::TestResponse {
    let (name, value) = from.auth();
    app.server
        .post(&format!("/api/messages/{}", to.id))
        .add_header(name, value)
        .json(&json!({ "body": body }))
        .await
}

#[tokio::test]
async fn test_strangers_cannot_message() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    let response = send(&app, &alice, &bob, "hello?").await;
    assert_api_error!(response, StatusCode::FORBIDDEN);

    let response = send(&app, &alice, &alice, "hello me").await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_conversation_flow() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    befriend(&app, &alice, &bob).await;

    let response = send(&app, &alice, &bob, "hi bob").await;
    assert_status!(response, StatusCode::OK);
    let sent: DirectMessage = response.json();
    assert_eq!(sent.status, MessageStatus::Pending);
    send(&app, &alice, &bob, "are you there?").await;

    let (name, value) = bob.auth();
    let response = app.server.get("/api/messages").add_header(name, value).await;
    let conversations: Vec<ConversationSummary> = response.json();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].peer_id, alice.id);
    assert_eq!(conversations[0].pending_count, 2);
    assert_eq!(conversations[0].last_message.body, "are you there?");

    let (name, value) = bob.auth();
    let response = app
        .server
        .get(&format!("/api/messages/{}", alice.id))
        .add_header(name, value)
        .await;
    let thread: Vec<DirectMessage> = response.json();
    assert_eq!(thread.len(), 2);
    assert!(thread.iter().all(|m| m.status == MessageStatus::Delivered));

    let (name, value) = bob.auth();
    let response = app.server.get("/api/messages").add_header(name, value).await;
    let conversations: Vec<ConversationSummary> = response.json();
    assert_eq!(conversations[0].pending_count, 0);
}

#[tokio::test]
async fn test_thread_is_paginated() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    befriend(&app, &alice, &bob).await;
    for i in 0..5 {
        send(&app, &alice, &bob, &format!("message {}", i)).await;
    }

    let thread = |query: &'static str| {
        let (name, value) = bob.auth();
        app.server
            .get(&format!("/api/messages/{}{}", alice.id, query))
            .add_header(name, value)
    };

    let page: Vec<DirectMessage> = thread("?limit=2").await.json();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].body, "message 4");

    let page: Vec<DirectMessage> = thread("?limit=2&offset=4").await.json();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].body, "message 0");
}

#[tokio::test]
async fn test_stream_requires_auth() {
    let app = spawn_app();

    let response = app.server.get("/api/messages/stream").await;
    assert_api_error!(response, StatusCode::UNAUTHORIZED);
}
