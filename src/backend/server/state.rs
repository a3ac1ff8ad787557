/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container, holding:
 * - The store handle (`Arc<dyn SocialStore>`)
 * - The loaded configuration
 * - Per-user broadcast channels for live message delivery
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers to extract specific
 * parts of the state without needing the entire `AppState`.
 *
 * # Example
 *
 * ```rust
 * use socialnet::backend::server::state::AppState;
 * use socialnet::backend::store::UserStore;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let _ = state.store.ping().await;
 * }
 * ```
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::FromRef;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::backend::server::config::AppConfig;
use crate::backend::store::SocialStore;
use crate::shared::DirectMessage;

/// Buffered messages per subscriber before a slow reader starts lagging
const CHANNEL_CAPACITY: usize = 100;

/// Broadcast state for direct messages
///
/// Manages per-recipient broadcast channels for SSE subscriptions. Each user
/// gets their own channel so a stream only ever carries that user's mail.
#[derive(Clone, Default)]
pub struct MessagingBroadcastState {
    channels: Arc<Mutex<HashMap<Uuid, broadcast::Sender<DirectMessage>>>>,
}

impl MessagingBroadcastState {
    pub fn new() -> Self {
        Self::default()
    }

    fn channels(&self) -> MutexGuard<'_, HashMap<Uuid, broadcast::Sender<DirectMessage>>> {
        self.channels.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get or create the sender for a user's channel
    pub fn get_sender(&self, user_id: Uuid) -> broadcast::Sender<DirectMessage> {
        self.channels()
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Subscribe to messages addressed to `user_id`
    pub fn subscribe(&self, user_id: Uuid) -> broadcast::Receiver<DirectMessage> {
        self.get_sender(user_id).subscribe()
    }

    /// Deliver a message to its recipient's live subscribers, if any
    pub fn broadcast(&self, message: DirectMessage) {
        if let Some(sender) = self.channels().get(&message.receiver_id) {
            let _ = sender.send(message); // Ignore if no receivers
        }
    }

    /// Clean up inactive channels (no subscribers)
    pub fn cleanup_inactive_channels(&self) {
        self.channels().retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Get subscriber count for a user's channel
    pub fn get_subscriber_count(&self, user_id: Uuid) -> usize {
        self.channels()
            .get(&user_id)
            .map_or(0, |sender| sender.receiver_count())
    }
}

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Persistence for users, friendships, posts and messages
    pub store: Arc<dyn SocialStore>,

    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// Messaging broadcast state for real-time message delivery
    pub messaging_broadcast: MessagingBroadcastState,
}

impl AppState {
    pub fn new(store: Arc<dyn SocialStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
            messaging_broadcast: MessagingBroadcastState::new(),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Memory-backed state with cheap hashing and no email verification
    pub(crate) fn for_tests() -> Self {
        let config = AppConfig::builder()
            .jwt_secret("test-secret")
            .bcrypt_cost(4)
            .require_email_verification(false)
            .build()
            .expect("test config is valid");
        Self::new(Arc::new(crate::backend::store::MemoryStore::new()), config)
    }
}

impl FromRef<AppState> for Arc<dyn SocialStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

/// Implement FromRef for MessagingBroadcastState
///
/// This allows Axum handlers to extract the messaging broadcast state
/// directly from `AppState`.
impl FromRef<AppState> for MessagingBroadcastState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.messaging_broadcast.clone()
    }
}
