//! Post API integration tests
//!
//! Tests for feed and explore composition, privacy enforcement, reactions,
//! comments, and scrubbing of deactivated contributors.

use std::collections::HashSet;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use socialnet::backend::store::PostStore;
use socialnet::shared::{Post, Privacy};
use uuid::Uuid;

use crate::common::*;
use crate::{assert_api_error, assert_ok, assert_status};

async fn list(app: &TestApp, user: &TestUser, path: &str) -> Vec<Post> {
    let (name, value) = user.auth();
    let response = app.server.get(path).add_header(name, value).await;
    assert_status!(response, StatusCode::OK);
    response.json()
}

fn ids(posts: &[Post]) -> HashSet<Uuid> {
    posts.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn test_create_post_defaults() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;

    let (name, value) = alice.auth();
    let response = app
        .server
        .post("/api/posts")
        .add_header(name, value)
        .json(&json!({ "content": "hello", "media": "  " }))
        .await;
    assert_status!(response, StatusCode::OK);
    let post: Post = response.json();
    assert_eq!(post.privacy, Privacy::Friends);
    assert_eq!(post.media, None);

    let (name, value) = alice.auth();
    let response = app
        .server
        .post("/api/posts")
        .add_header(name, value)
        .json(&json!({ "content": "" }))
        .await;
    assert_api_error!(response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feed_and_explore() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let carol = create_test_user(&app, "carol").await;
    befriend(&app, &alice, &bob).await;

    let own = create_post(&app, &alice, "mine", "private").await;
    let bob_public = create_post(&app, &bob, "bob public", "public").await;
    let bob_friends = create_post(&app, &bob, "bob friends", "friends").await;
    create_post(&app, &bob, "bob private", "private").await;
    let carol_public = create_post(&app, &carol, "carol public", "public").await;
    create_post(&app, &carol, "carol friends", "friends").await;

    let feed = list(&app, &alice, "/api/posts/feed").await;
    assert_eq!(ids(&feed), HashSet::from([own, bob_public, bob_friends]));

    let explore = list(&app, &alice, "/api/posts/explore").await;
    assert_eq!(ids(&explore), HashSet::from([carol_public]));

    let mine = list(&app, &alice, "/api/posts/mine").await;
    assert_eq!(ids(&mine), HashSet::from([own]));
}

#[tokio::test]
async fn test_hidden_post_is_forbidden() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let post = create_post(&app, &alice, "friends only", "friends").await;

    let (name, value) = bob.auth();
    let response = app
        .server
        .get(&format!("/api/posts/{}", post))
        .add_header(name, value)
        .await;
    assert_api_error!(response, StatusCode::FORBIDDEN);

    let (name, value) = bob.auth();
    let response = app
        .server
        .post(&format!("/api/posts/{}/like", post))
        .add_header(name, value)
        .await;
    assert_api_error!(response, StatusCode::FORBIDDEN);

    let (name, value) = bob.auth();
    let response = app
        .server
        .get(&format!("/api/posts/{}", Uuid::new_v4()))
        .add_header(name, value)
        .await;
    assert_api_error!(response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reactions_are_exclusive() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let post = create_post(&app, &alice, "react to me", "public").await;

    let (name, value) = bob.auth();
    let response = app
        .server
        .post(&format!("/api/posts/{}/like", post))
        .add_header(name, value)
        .await;
    let liked: Post = response.json();
    assert_eq!(liked.likes, vec![bob.id]);

    let (name, value) = bob.auth();
    let response = app
        .server
        .post(&format!("/api/posts/{}/dislike", post))
        .add_header(name, value)
        .await;
    let disliked: Post = response.json();
    assert!(disliked.likes.is_empty());
    assert_eq!(disliked.dislikes, vec![bob.id]);

    let (name, value) = bob.auth();
    let response = app
        .server
        .delete(&format!("/api/posts/{}/reaction", post))
        .add_header(name, value)
        .await;
    let cleared: Post = response.json();
    assert!(cleared.likes.is_empty());
    assert!(cleared.dislikes.is_empty());
}

#[tokio::test]
async fn test_comment_thread() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let post = create_post(&app, &alice, "discuss", "public").await;

    let (name, value) = bob.auth();
    let response = app
        .server
        .post(&format!("/api/posts/{}/comments", post))
        .add_header(name, value)
        .json(&json!({ "text": "first" }))
        .await;
    assert_status!(response, StatusCode::OK);
    let commented: Post = response.json();
    let comment_id = commented.comments[0].id;

    let (name, value) = alice.auth();
    let response = app
        .server
        .post(&format!("/api/posts/{}/comments/{}/replies", post, comment_id))
        .add_header(name, value)
        .json(&json!({ "text": "thanks" }))
        .await;
    let replied: Post = response.json();
    assert_eq!(replied.comments[0].replies.len(), 1);

    let (name, value) = alice.auth();
    let response = app
        .server
        .post(&format!("/api/posts/{}/comments/{}/like", post, comment_id))
        .add_header(name, value)
        .await;
    let liked: Post = response.json();
    assert_eq!(liked.comments[0].likes, vec![alice.id]);

    // The post owner may remove someone else's comment
    let (name, value) = alice.auth();
    let response = app
        .server
        .delete(&format!("/api/posts/{}/comments/{}", post, comment_id))
        .add_header(name, value)
        .await;
    let cleaned: Post = response.json();
    assert!(cleaned.comments.is_empty());
}

#[tokio::test]
async fn test_only_owner_deletes_post() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let post = create_post(&app, &alice, "keep out", "public").await;

    let (name, value) = bob.auth();
    let response = app
        .server
        .delete(&format!("/api/posts/{}", post))
        .add_header(name, value)
        .await;
    assert_api_error!(response, StatusCode::FORBIDDEN);

    let (name, value) = alice.auth();
    let response = app
        .server
        .delete(&format!("/api/posts/{}", post))
        .add_header(name, value)
        .await;
    assert_status!(response, StatusCode::OK);

    assert!(list(&app, &alice, "/api/posts/mine").await.is_empty());
}

#[tokio::test]
async fn test_deactivated_contributions_are_scrubbed() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    let post = create_post(&app, &alice, "popular", "public").await;

    let (name, value) = bob.auth();
    app.server
        .post(&format!("/api/posts/{}/like", post))
        .add_header(name, value)
        .await;
    let (name, value) = bob.auth();
    app.server
        .post(&format!("/api/posts/{}/comments", post))
        .add_header(name, value)
        .json(&json!({ "text": "nice" }))
        .await;

    let (name, value) = bob.auth();
    app.server
        .post("/api/account/deactivate")
        .add_header(name, value)
        .await;

    let (name, value) = alice.auth();
    let response = app
        .server
        .get(&format!("/api/posts/{}", post))
        .add_header(name, value)
        .await;
    let scrubbed: Post = response.json();
    assert!(scrubbed.likes.is_empty());
    assert!(scrubbed.comments.is_empty());
}

#[tokio::test]
async fn test_post_lists_are_paginated() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    let bob = create_test_user(&app, "bob").await;
    for i in 0..25 {
        create_post(&app, &alice, &format!("post {}", i), "public").await;
    }

    assert_eq!(list(&app, &alice, "/api/posts/mine").await.len(), 20);
    assert_eq!(list(&app, &alice, "/api/posts/feed?limit=10").await.len(), 10);
    assert_eq!(list(&app, &bob, "/api/posts/explore?limit=10&offset=20").await.len(), 5);
    assert_eq!(list(&app, &bob, "/api/users/alice/posts?limit=7").await.len(), 7);

    let first = list(&app, &alice, "/api/posts/mine?limit=10").await;
    let second = list(&app, &alice, "/api/posts/mine?limit=10&offset=10").await;
    assert!(ids(&first).is_disjoint(&ids(&second)));
    assert!(first
        .iter()
        .zip(first.iter().skip(1))
        .all(|(newer, older)| newer.created_at >= older.created_at));
}

#[tokio::test]
async fn test_page_size_is_capped() {
    let app = spawn_app();
    let alice = create_test_user(&app, "alice").await;
    for i in 0..105 {
        let post = Post::new(alice.id, format!("bulk {}", i), None, Privacy::Public);
        assert_ok!(app.store.insert_post(&post).await);
    }

    assert_eq!(list(&app, &alice, "/api/posts/mine?limit=500").await.len(), 100);
    assert_eq!(list(&app, &alice, "/api/posts/mine?limit=500&offset=100").await.len(), 5);
}
