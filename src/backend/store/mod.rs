//! Store Module
//!
//! Persistence seams for the backend. Each domain gets its own async trait,
//! and [`SocialStore`] bundles them so handlers can hold a single
//! `Arc<dyn SocialStore>`.
//!
//! # Implementations
//!
//! - **`postgres::PgStore`** - sqlx connection pool. The per-domain SQL lives
//!   beside its domain (`auth::users`, `friendship::db`, `posts::db`,
//!   `messaging::db`).
//! - **`memory::MemoryStore`** - `RwLock`ed maps, used for development runs
//!   without `DATABASE_URL` and by the test suite.
//!
//! # Atomicity
//!
//! Operations that touch more than one row (accepting or removing a
//! friendship, creating, mutating or deleting a post) are single trait
//! methods so each implementation can run them in one transaction or under
//! one write lock. Counters only move through [`CounterDelta`] increments.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::backend::auth::users::{NewUser, User};
use crate::shared::messaging::ConversationSummary;
use crate::shared::{
    DirectMessage, Friendship, FriendshipStatus, Page, Post, PostError, PostMutation, Privacy,
    Role,
};

/// PostgreSQL store
pub mod postgres;

/// In-memory store
pub mod memory;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by a store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// A post mutation was refused by the post itself
    #[error(transparent)]
    Post(#[from] PostError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt {entity} row: {message}")]
    Corrupt {
        entity: &'static str,
        message: String,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A single-field change to a user row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserUpdate {
    Bio(String),
    Occupation(String),
    ProfilePicture(String),
    /// `None` clears the status
    Status {
        text: Option<String>,
        changed_at: DateTime<Utc>,
    },
    PasswordHash(String),
    /// Marks the account verified and drops the verification token
    Verified,
    ResetToken {
        token: String,
        expires_at: DateTime<Utc>,
    },
    /// Sets a new hash and drops the reset token
    ResetPassword(String),
    Deactivated(bool),
    Role(Role),
}

/// Relative change to a user's denormalized counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub post_count: i64,
    pub friend_count: i64,
    pub activity: i64,
}

impl CounterDelta {
    pub fn activity(delta: i64) -> Self {
        Self {
            activity: delta,
            ..Self::default()
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Absolute counter values, written by reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Counters {
    pub post_count: i64,
    pub friend_count: i64,
    pub activity: i64,
}

/// Ground-truth engagement of one user's posts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngagementStats {
    pub post_count: i64,
    /// likes + dislikes + comments across every post
    pub engagement: i64,
}

/// Filter for listing posts, newest first.
///
/// A post matches when its owner is active, is in `owners` (or `owners` is
/// `None`), is not in `exclude_owners`, and either its privacy is in
/// `privacy` or its owner is `always_include`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub owners: Option<Vec<Uuid>>,
    pub exclude_owners: Vec<Uuid>,
    pub privacy: Vec<Privacy>,
    pub always_include: Option<Uuid>,
    pub page: Page,
}

impl PostQuery {
    pub fn matches(&self, post: &Post) -> bool {
        let owner_ok = self
            .owners
            .as_ref()
            .map_or(true, |owners| owners.contains(&post.user_id));
        owner_ok
            && !self.exclude_owners.contains(&post.user_id)
            && (self.privacy.contains(&post.privacy) || self.always_include == Some(post.user_id))
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; duplicate username or email is a `Conflict`
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn user_by_verification_token(&self, token: &str) -> StoreResult<Option<User>>;

    async fn user_by_reset_token(&self, token: &str) -> StoreResult<Option<User>>;

    /// Existing users among `ids`; missing ids are skipped
    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<User>;

    async fn set_counters(&self, id: Uuid, counters: Counters) -> StoreResult<()>;

    /// Cheap reachability probe for health checks
    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait FriendshipStore: Send + Sync {
    /// Insert a pending request; any existing edge for the pair is a `Conflict`
    async fn insert_friendship(&self, friendship: &Friendship) -> StoreResult<()>;

    /// The edge between `a` and `b` in either direction
    async fn friendship_between(&self, a: Uuid, b: Uuid) -> StoreResult<Option<Friendship>>;

    /// Every edge touching `user`, optionally filtered by status
    async fn friendships_of(
        &self,
        user: Uuid,
        status: Option<FriendshipStatus>,
    ) -> StoreResult<Vec<Friendship>>;

    /// Mark a pending edge accepted and bump both friend counters
    async fn accept_friendship(&self, id: Uuid) -> StoreResult<Friendship>;

    /// Delete an edge; an accepted edge also decrements both friend counters
    async fn delete_friendship(&self, id: Uuid) -> StoreResult<Friendship>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post and bump the owner's post counter
    async fn insert_post(&self, post: &Post) -> StoreResult<()>;

    async fn post_by_id(&self, id: Uuid) -> StoreResult<Option<Post>>;

    async fn query_posts(&self, query: &PostQuery) -> StoreResult<Vec<Post>>;

    /// Apply a mutation under a row lock and move the owner's activity by
    /// the resulting engagement delta
    async fn mutate_post(&self, id: Uuid, mutation: &PostMutation) -> StoreResult<Post>;

    /// Delete a post, decrementing the owner's post counter and removing
    /// the post's engagement from their activity
    async fn delete_post(&self, id: Uuid) -> StoreResult<Post>;

    /// Post count and engagement per user, computed from the posts
    /// themselves. Users without posts are absent from the map.
    async fn engagement_stats(&self, users: &[Uuid]) -> StoreResult<HashMap<Uuid, EngagementStats>>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert_message(&self, message: &DirectMessage) -> StoreResult<()>;

    /// Messages between `a` and `b`, newest first
    async fn thread(&self, a: Uuid, b: Uuid, page: Page) -> StoreResult<Vec<DirectMessage>>;

    /// Mark everything `sender` sent `receiver` as delivered
    async fn mark_delivered(&self, receiver: Uuid, sender: Uuid) -> StoreResult<u64>;

    /// One summary per peer, most recent conversation first
    async fn conversations(&self, user: Uuid) -> StoreResult<Vec<ConversationSummary>>;
}

/// Every store capability the backend needs
pub trait SocialStore: UserStore + FriendshipStore + PostStore + MessageStore {}

impl<T> SocialStore for T where T: UserStore + FriendshipStore + PostStore + MessageStore {}
