/**
 * In-Memory Store
 *
 * Implements every store trait over plain maps behind one `tokio::sync::RwLock`.
 * Multi-row operations hold the write lock for their whole duration, which
 * gives them the same all-or-nothing behaviour the Postgres store gets from
 * transactions.
 *
 * Used when `DATABASE_URL` is unset and by the test suite.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CounterDelta, Counters, EngagementStats, FriendshipStore, MessageStore, PostQuery,
    PostStore, StoreError, StoreResult, UserStore, UserUpdate,
};
use crate::backend::auth::users::{NewUser, User};
use crate::shared::messaging::ConversationSummary;
use crate::shared::{
    DirectMessage, Friendship, FriendshipStatus, MessageStatus, Page, Post, PostMutation,
};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    friendships: HashMap<Uuid, Friendship>,
    posts: HashMap<Uuid, Post>,
    messages: Vec<DirectMessage>,
}

impl Inner {
    fn adjust(&mut self, user: Uuid, delta: CounterDelta) {
        if delta.is_zero() {
            return;
        }
        if let Some(user) = self.users.get_mut(&user) {
            user.apply_delta(delta);
        }
    }

    fn find_user(&self, predicate: impl Fn(&User) -> bool) -> Option<User> {
        self.users.values().find(|u| predicate(u)).cloned()
    }
}

/// Map-backed store
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("Username already exists".to_string()));
        }
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email already exists".to_string()));
        }

        let user = user.into_user();
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.find_user(|u| u.username == username))
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.inner.read().await.find_user(|u| u.email == email))
    }

    async fn user_by_verification_token(&self, token: &str) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .find_user(|u| u.verification_token.as_deref() == Some(token)))
    }

    async fn user_by_reset_token(&self, token: &str) -> StoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .find_user(|u| u.reset_token.as_deref() == Some(token)))
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let inner = self.inner.read().await;
        Ok(ids.iter().filter_map(|id| inner.users.get(id).cloned()).collect())
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<User> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound("User"))?;
        user.apply(update);
        Ok(user.clone())
    }

    async fn set_counters(&self, id: Uuid, counters: Counters) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound("User"))?;
        user.post_count = counters.post_count;
        user.friend_count = counters.friend_count;
        user.activity = counters.activity;
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl FriendshipStore for MemoryStore {
    async fn insert_friendship(&self, friendship: &Friendship) -> StoreResult<()> {
        let mut inner = self.inner.write().await;

        if inner
            .friendships
            .values()
            .any(|f| f.joins(friendship.user1, friendship.user2))
        {
            return Err(StoreError::Conflict(
                "A friendship or request already exists between these users".to_string(),
            ));
        }

        inner.friendships.insert(friendship.id, friendship.clone());
        Ok(())
    }

    async fn friendship_between(&self, a: Uuid, b: Uuid) -> StoreResult<Option<Friendship>> {
        let inner = self.inner.read().await;
        Ok(inner.friendships.values().find(|f| f.joins(a, b)).cloned())
    }

    async fn friendships_of(
        &self,
        user: Uuid,
        status: Option<FriendshipStatus>,
    ) -> StoreResult<Vec<Friendship>> {
        let inner = self.inner.read().await;
        let mut edges: Vec<Friendship> = inner
            .friendships
            .values()
            .filter(|f| f.involves(user) && status.map_or(true, |s| f.status == s))
            .cloned()
            .collect();
        edges.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(edges)
    }

    async fn accept_friendship(&self, id: Uuid) -> StoreResult<Friendship> {
        let mut inner = self.inner.write().await;

        let friendship = match inner.friendships.get_mut(&id) {
            Some(f) if f.status == FriendshipStatus::Pending => {
                f.status = FriendshipStatus::Accepted;
                f.updated_at = Utc::now();
                f.clone()
            }
            _ => return Err(StoreError::NotFound("Friend request")),
        };

        let bump = CounterDelta {
            friend_count: 1,
            ..CounterDelta::default()
        };
        inner.adjust(friendship.user1, bump);
        inner.adjust(friendship.user2, bump);
        Ok(friendship)
    }

    async fn delete_friendship(&self, id: Uuid) -> StoreResult<Friendship> {
        let mut inner = self.inner.write().await;

        let friendship = inner
            .friendships
            .remove(&id)
            .ok_or(StoreError::NotFound("Friendship"))?;

        if friendship.is_accepted() {
            let drop = CounterDelta {
                friend_count: -1,
                ..CounterDelta::default()
            };
            inner.adjust(friendship.user1, drop);
            inner.adjust(friendship.user2, drop);
        }
        Ok(friendship)
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, post: &Post) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.posts.insert(post.id, post.clone());
        inner.adjust(
            post.user_id,
            CounterDelta {
                post_count: 1,
                ..CounterDelta::default()
            },
        );
        Ok(())
    }

    async fn post_by_id(&self, id: Uuid) -> StoreResult<Option<Post>> {
        Ok(self.inner.read().await.posts.get(&id).cloned())
    }

    async fn query_posts(&self, query: &PostQuery) -> StoreResult<Vec<Post>> {
        let inner = self.inner.read().await;

        let mut posts: Vec<&Post> = inner
            .posts
            .values()
            .filter(|p| {
                inner
                    .users
                    .get(&p.user_id)
                    .map_or(false, |owner| !owner.deactivated)
            })
            .filter(|p| query.matches(p))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(query.page.slice(posts.into_iter().cloned()))
    }

    async fn mutate_post(&self, id: Uuid, mutation: &PostMutation) -> StoreResult<Post> {
        let mut inner = self.inner.write().await;

        let stored = inner.posts.get_mut(&id).ok_or(StoreError::NotFound("Post"))?;
        // Apply to a copy so a refused mutation leaves the stored post untouched.
        let mut post = stored.clone();
        let delta = post.apply(mutation)?;
        *stored = post.clone();

        inner.adjust(post.user_id, CounterDelta::activity(delta));
        Ok(post)
    }

    async fn delete_post(&self, id: Uuid) -> StoreResult<Post> {
        let mut inner = self.inner.write().await;

        let post = inner.posts.remove(&id).ok_or(StoreError::NotFound("Post"))?;
        inner.adjust(
            post.user_id,
            CounterDelta {
                post_count: -1,
                friend_count: 0,
                activity: -post.engagement(),
            },
        );
        Ok(post)
    }

    async fn engagement_stats(
        &self,
        users: &[Uuid],
    ) -> StoreResult<HashMap<Uuid, EngagementStats>> {
        let inner = self.inner.read().await;

        let mut stats: HashMap<Uuid, EngagementStats> = HashMap::new();
        for post in inner.posts.values().filter(|p| users.contains(&p.user_id)) {
            let entry = stats.entry(post.user_id).or_default();
            entry.post_count += 1;
            entry.engagement += post.engagement();
        }
        Ok(stats)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(&self, message: &DirectMessage) -> StoreResult<()> {
        self.inner.write().await.messages.push(message.clone());
        Ok(())
    }

    async fn thread(&self, a: Uuid, b: Uuid, page: Page) -> StoreResult<Vec<DirectMessage>> {
        let inner = self.inner.read().await;

        let mut messages: Vec<&DirectMessage> = inner
            .messages
            .iter()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b) || (m.sender_id == b && m.receiver_id == a)
            })
            .collect();
        // Insertion order breaks timestamp ties, newest first.
        messages.reverse();
        messages.sort_by(|x, y| y.created_at.cmp(&x.created_at));

        Ok(page.slice(messages.into_iter().cloned()))
    }

    async fn mark_delivered(&self, receiver: Uuid, sender: Uuid) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;

        let mut updated = 0;
        for message in inner.messages.iter_mut().filter(|m| {
            m.receiver_id == receiver && m.sender_id == sender && m.status == MessageStatus::Pending
        }) {
            message.status = MessageStatus::Delivered;
            updated += 1;
        }
        Ok(updated)
    }

    async fn conversations(&self, user: Uuid) -> StoreResult<Vec<ConversationSummary>> {
        let inner = self.inner.read().await;

        let mut by_peer: HashMap<Uuid, ConversationSummary> = HashMap::new();
        for message in inner
            .messages
            .iter()
            .filter(|m| m.sender_id == user || m.receiver_id == user)
        {
            let peer = message.peer_of(user);
            let pending = i64::from(
                message.receiver_id == user && message.status == MessageStatus::Pending,
            );
            by_peer
                .entry(peer)
                .and_modify(|summary| {
                    if message.created_at >= summary.last_message.created_at {
                        summary.last_message = message.clone();
                    }
                    summary.pending_count += pending;
                })
                .or_insert_with(|| ConversationSummary {
                    peer_id: peer,
                    last_message: message.clone(),
                    pending_count: pending,
                });
        }

        let mut summaries: Vec<ConversationSummary> = by_peer.into_values().collect();
        summaries.sort_by(|a, b| b.last_message.created_at.cmp(&a.last_message.created_at));
        Ok(summaries)
    }
}
