//! Friendship API integration tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use socialnet::shared::friendship::{PendingRequestsResponse, Relation, RelationResponse};
use socialnet::shared::{Friendship, FriendshipStatus, RankedProfile, UserProfile};

use crate::common::*;
use crate::{assert_api_error, assert_status};

async fn relation(app: &TestApp, viewer: &TestUser, other: &TestUser) -> Relation {
    let (name, value) = viewer.auth();
    let response = app
        .server
        .get(&format!("/api/friends/status/{}", other.id))
        .add_header(name, value)
        .await;
    let body: RelationResponse = response.json();
    body.relation
}

async fn send_request(app: &TestApp, from: &TestUser, to: &TestUser) -> axum_test::TestResponse {
    let (name, value) = from.auth();
    app.server
        .post("/api/friends/requests")
        .add_header(name, value)
        .json(&json!({ "user_id": to.id }))
        .await
}

#[tokio::test]
async fn test_request_lifecycle() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    assert_eq!(relation(&app, &alice, &bob).await, Relation::None);
    assert_eq!(relation(&app, &alice, &alice).await, Relation::Yourself);

    let response = send_request(&app, &alice, &bob).await;
    assert_status!(response, StatusCode::OK);
    let edge: Friendship = response.json();
    assert_eq!(edge.status, FriendshipStatus::Pending);

    assert_eq!(relation(&app, &alice, &bob).await, Relation::RequestSent);
    assert_eq!(relation(&app, &bob, &alice).await, Relation::RequestReceived);

    // Either direction conflicts while the request is open
    let response = send_request(&app, &bob, &alice).await;
    assert_api_error!(response, StatusCode::CONFLICT);

    let (name, value) = bob.auth();
    let response = app.server.get("/api/friends/requests").add_header(name, value).await;
    let pending: PendingRequestsResponse = response.json();
    assert_eq!(pending.incoming.len(), 1);
    assert_eq!(pending.incoming[0].id, alice.id);
    assert!(pending.outgoing.is_empty());

    let (name, value) = bob.auth();
    let response = app
        .server
        .post(&format!("/api/friends/requests/{}/accept", alice.id))
        .add_header(name, value)
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(relation(&app, &alice, &bob).await, Relation::Friends);

    let (name, value) = alice.auth();
    let response = app.server.get("/api/friends").add_header(name, value).await;
    let friends: Vec<UserProfile> = response.json();
    assert_eq!(friends.len(), 1);
    assert_eq!(friends[0].friend_count, 1);
}

#[tokio::test]
async fn test_reject_and_cancel() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    send_request(&app, &alice, &bob).await;
    let (name, value) = bob.auth();
    let response = app
        .server
        .post(&format!("/api/friends/requests/{}/reject", alice.id))
        .add_header(name, value)
        .await;
    assert_status!(response, StatusCode::OK);
    let edge: Friendship = response.json();
    assert_eq!(edge.status, FriendshipStatus::Rejected);
    assert_eq!(relation(&app, &alice, &bob).await, Relation::None);

    // Rejection leaves room for a fresh request
    let response = send_request(&app, &alice, &bob).await;
    assert_status!(response, StatusCode::OK);

    let (name, value) = alice.auth();
    let response = app
        .server
        .delete(&format!("/api/friends/requests/{}", bob.id))
        .add_header(name, value)
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(relation(&app, &bob, &alice).await, Relation::None);
}

#[tokio::test]
async fn test_sender_cannot_answer_own_request() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    send_request(&app, &alice, &bob).await;

    for action in ["accept", "reject"] {
        let (name, value) = alice.auth();
        let response = app
            .server
            .post(&format!("/api/friends/requests/{}/{}", bob.id, action))
            .add_header(name, value)
            .await;
        assert_api_error!(response, StatusCode::FORBIDDEN);
    }
    assert_eq!(relation(&app, &alice, &bob).await, Relation::RequestSent);
}

#[tokio::test]
async fn test_self_request_rejected() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;

    let response = send_request(&app, &alice, &alice).await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unfriend() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;

    let (name, value) = alice.auth();
    let response = app
        .server
        .delete(&format!("/api/friends/{}", bob.id))
        .add_header(name, value)
        .await;
    assert_api_error!(response, StatusCode::NOT_FOUND);

    befriend(&app, &alice, &bob).await;
    let (name, value) = alice.auth();
    let response = app
        .server
        .delete(&format!("/api/friends/{}", bob.id))
        .add_header(name, value)
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(relation(&app, &bob, &alice).await, Relation::None);
}

#[tokio::test]
async fn test_top_contributor_and_suggestions() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let carol = create_test_user(&app, "carol").await;
    let dave = create_test_user(&app, "dave").await;
    befriend(&app, &alice, &bob).await;
    befriend(&app, &alice, &carol).await;
    befriend(&app, &bob, &dave).await;

    // Nobody has posted yet
    let (name, value) = alice.auth();
    let response = app.server.get("/api/friends/top-contributor").add_header(name, value).await;
    assert_status!(response, StatusCode::OK);
    let top: Option<RankedProfile> = response.json();
    assert!(top.is_none());

    create_post(&app, &carol, "one", "public").await;
    create_post(&app, &carol, "two", "public").await;
    create_post(&app, &bob, "three", "public").await;

    let (name, value) = alice.auth();
    let response = app.server.get("/api/friends/top-contributor").add_header(name, value).await;
    let top: Option<RankedProfile> = response.json();
    let top = top.expect("a top contributor");
    assert_eq!(top.user.id, carol.id);
    assert_eq!(top.score, 2);

    let (name, value) = alice.auth();
    let response = app.server.get("/api/friends/suggestions").add_header(name, value).await;
    let suggestions: Vec<UserProfile> = response.json();
    let ids: Vec<_> = suggestions.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![dave.id]);
}
