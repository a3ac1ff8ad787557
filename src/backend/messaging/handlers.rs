//! Messaging HTTP Handlers
//!
//! Direct messages between accepted friends. Sending stores the message and
//! pushes it to the recipient's live stream; reading a thread marks the
//! caller's incoming messages from that peer as delivered.

use std::collections::HashSet;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::backend::account::active_user;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::store::{FriendshipStore, MessageStore, UserStore};
use crate::shared::messaging::{ConversationSummary, SendMessageRequest};
use crate::shared::{DirectMessage, Pagination};

/// POST /api/messages/{user_id}
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(peer_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<DirectMessage>, BackendError> {
    if peer_id == me.id {
        return Err(BackendError::bad_request("You cannot message yourself"));
    }
    let body = request.body.trim();
    if body.is_empty() {
        return Err(BackendError::bad_request("Message body must not be empty"));
    }

    let peer = active_user(&state, peer_id).await?;
    let friends = state
        .store
        .friendship_between(me.id, peer.id)
        .await?
        .is_some_and(|edge| edge.is_accepted());
    if !friends {
        tracing::warn!("{} tried to message non-friend {}", me.username, peer.username);
        return Err(BackendError::forbidden("You can only message your friends"));
    }

    let message = DirectMessage::new(me.id, peer.id, body);
    state.store.insert_message(&message).await?;
    state.messaging_broadcast.broadcast(message.clone());

    tracing::info!("Message {} sent: {} -> {}", message.id, me.username, peer.username);
    Ok(Json(message))
}

/// GET /api/messages/{user_id}
///
/// Newest first. The caller's pending messages from the peer are marked
/// delivered before the page is read.
pub async fn get_thread(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(peer_id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<DirectMessage>>, BackendError> {
    if peer_id == me.id {
        return Err(BackendError::bad_request("You cannot message yourself"));
    }
    let peer = active_user(&state, peer_id).await?;

    let delivered = state.store.mark_delivered(me.id, peer.id).await?;
    if delivered > 0 {
        tracing::debug!("Marked {} messages from {} delivered", delivered, peer.username);
    }

    let thread = state.store.thread(me.id, peer.id, pagination.page()).await?;
    Ok(Json(thread))
}

/// GET /api/messages
///
/// One summary per peer, most recent conversation first. Peers that are
/// deactivated or gone are left out.
pub async fn list_conversations(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<ConversationSummary>>, BackendError> {
    let summaries = state.store.conversations(me.id).await?;

    let peers: Vec<Uuid> = summaries.iter().map(|s| s.peer_id).collect();
    let active: HashSet<Uuid> = state
        .store
        .users_by_ids(&peers)
        .await?
        .into_iter()
        .filter(|u| !u.deactivated)
        .map(|u| u.id)
        .collect();

    Ok(Json(
        summaries
            .into_iter()
            .filter(|s| active.contains(&s.peer_id))
            .collect(),
    ))
}
