/**
 * Friendship Handlers
 *
 * HTTP handlers for friend requests and for the friend-derived views:
 * friends list, pending requests, relation status, top contributor,
 * most-active friend and suggestions.
 *
 * Targeting yourself is a 400. Targeting an unknown or deactivated user is
 * a 404. Only the recipient of a request may accept or reject it.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::account::active_user;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::social::{
    active_friends, rank_by_activity, rank_by_post_count, suggest_friends, RankedUser,
};
use crate::backend::store::{FriendshipStore, UserStore};
use crate::shared::friendship::{
    PendingRequestsResponse, Relation, RelationResponse, SendFriendRequestRequest,
};
use crate::shared::{Friendship, FriendshipStatus, RankedProfile, UserProfile};

fn not_self(me: &User, target: Uuid) -> Result<(), BackendError> {
    if me.id == target {
        tracing::warn!("User {} targeted themselves", me.username);
        return Err(BackendError::bad_request("You cannot target yourself"));
    }
    Ok(())
}

/// The pending request `from` sent to `to`, or 404
async fn pending_request(
    state: &AppState,
    from: Uuid,
    to: Uuid,
) -> Result<Friendship, BackendError> {
    state
        .store
        .friendship_between(from, to)
        .await?
        .filter(|f| f.status == FriendshipStatus::Pending && f.user1 == from && f.user2 == to)
        .ok_or_else(|| BackendError::not_found("Friend request not found"))
}

/// The pending request `requester` sent to `me`.
///
/// 404 when no request is pending between the two, 403 when the pending
/// request is the caller's own outgoing one.
async fn incoming_request(
    state: &AppState,
    me: &User,
    requester: Uuid,
) -> Result<Friendship, BackendError> {
    let request = state
        .store
        .friendship_between(me.id, requester)
        .await?
        .filter(|f| f.status == FriendshipStatus::Pending)
        .ok_or_else(|| BackendError::not_found("Friend request not found"))?;

    if request.user2 != me.id {
        tracing::warn!("{} tried to answer their own request to {}", me.username, requester);
        return Err(BackendError::forbidden(
            "Only the recipient can answer a friend request",
        ));
    }
    Ok(request)
}

/// POST /api/friends/requests
pub async fn send_friend_request(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Json(request): Json<SendFriendRequestRequest>,
) -> Result<Json<Friendship>, BackendError> {
    not_self(&me, request.user_id)?;
    let target = active_user(&state, request.user_id).await?;

    if let Some(existing) = state.store.friendship_between(me.id, target.id).await? {
        tracing::warn!(
            "Friend request {} -> {} rejected, edge already {}",
            me.username,
            target.username,
            existing.status.as_str()
        );
        return Err(if existing.is_accepted() {
            BackendError::conflict("You are already friends")
        } else {
            BackendError::conflict("A friend request is already pending")
        });
    }

    let friendship = Friendship::request(me.id, target.id);
    state.store.insert_friendship(&friendship).await?;

    tracing::info!("Friend request sent: {} -> {}", me.username, target.username);
    Ok(Json(friendship))
}

/// DELETE /api/friends/requests/{user_id}
pub async fn cancel_friend_request(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Friendship>, BackendError> {
    not_self(&me, user_id)?;
    let request = pending_request(&state, me.id, user_id).await?;
    let removed = state.store.delete_friendship(request.id).await?;

    tracing::info!("Friend request {} -> {} cancelled", me.username, user_id);
    Ok(Json(removed))
}

/// POST /api/friends/requests/{user_id}/accept
pub async fn accept_friend_request(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Friendship>, BackendError> {
    not_self(&me, user_id)?;
    let requester = active_user(&state, user_id).await?;
    let request = incoming_request(&state, &me, requester.id).await?;
    let accepted = state.store.accept_friendship(request.id).await?;

    tracing::info!("{} accepted friend request from {}", me.username, requester.username);
    Ok(Json(accepted))
}

/// POST /api/friends/requests/{user_id}/reject
pub async fn reject_friend_request(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Friendship>, BackendError> {
    not_self(&me, user_id)?;
    let request = incoming_request(&state, &me, user_id).await?;
    let mut rejected = state.store.delete_friendship(request.id).await?;
    rejected.status = FriendshipStatus::Rejected;

    tracing::info!("{} rejected friend request from {}", me.username, user_id);
    Ok(Json(rejected))
}

/// DELETE /api/friends/{user_id}
pub async fn unfriend(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Friendship>, BackendError> {
    not_self(&me, user_id)?;
    let edge = state
        .store
        .friendship_between(me.id, user_id)
        .await?
        .ok_or_else(|| BackendError::not_found("You are not friends with this user"))?;

    if !edge.is_accepted() {
        tracing::warn!("{} tried to unfriend {} with a pending request", me.username, user_id);
        return Err(BackendError::bad_request(
            "Friend request is still pending; cancel or reject it instead",
        ));
    }

    let removed = state.store.delete_friendship(edge.id).await?;
    tracing::info!("{} unfriended {}", me.username, user_id);
    Ok(Json(removed))
}

/// GET /api/friends
pub async fn list_friends(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    let ttl = state.config.status_ttl();
    let friends = active_friends(state.store.as_ref(), me.id).await?;
    tracing::debug!("{} has {} active friends", me.username, friends.len());
    Ok(Json(friends.iter().map(|u| u.to_profile(ttl)).collect()))
}

/// GET /api/friends/requests
pub async fn pending_requests(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<PendingRequestsResponse>, BackendError> {
    let pending = state
        .store
        .friendships_of(me.id, Some(FriendshipStatus::Pending))
        .await?;

    let ids: Vec<Uuid> = pending.iter().filter_map(|f| f.counterpart(me.id)).collect();
    let users = state.store.users_by_ids(&ids).await?;
    let ttl = state.config.status_ttl();
    let profile = |id: Uuid| {
        users
            .iter()
            .find(|u| u.id == id && !u.deactivated)
            .map(|u| u.to_profile(ttl))
    };

    let mut response = PendingRequestsResponse::default();
    for request in &pending {
        if request.user2 == me.id {
            response.incoming.extend(profile(request.user1));
        } else {
            response.outgoing.extend(profile(request.user2));
        }
    }
    Ok(Json(response))
}

/// GET /api/friends/status/{user_id}
pub async fn relation_status(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RelationResponse>, BackendError> {
    let relation = if user_id == me.id {
        Relation::Yourself
    } else {
        active_user(&state, user_id).await?;
        match state.store.friendship_between(me.id, user_id).await? {
            None => Relation::None,
            Some(edge) if edge.is_accepted() => Relation::Friends,
            Some(edge) if edge.user1 == me.id => Relation::RequestSent,
            Some(_) => Relation::RequestReceived,
        }
    };
    Ok(Json(RelationResponse { user_id, relation }))
}

/// The first ranked friend with a positive score, as a profile
fn leader(
    state: &AppState,
    friends: &[User],
    ranking: Vec<RankedUser>,
) -> Option<RankedProfile> {
    let top = ranking.into_iter().find(|r| r.score >= 1)?;
    let user = friends.iter().find(|u| u.id == top.user_id)?;
    Some(RankedProfile {
        user: user.to_profile(state.config.status_ttl()),
        score: top.score,
    })
}

/// GET /api/friends/top-contributor
///
/// The friend with the most posts; `null` when no friend has posted.
pub async fn top_contributor(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Option<RankedProfile>>, BackendError> {
    let friends = active_friends(state.store.as_ref(), me.id).await?;
    let ids: Vec<Uuid> = friends.iter().map(|u| u.id).collect();
    let ranking = rank_by_post_count(state.store.as_ref(), &ids, None).await?;
    Ok(Json(leader(&state, &friends, ranking)))
}

/// GET /api/friends/most-active
///
/// The friend whose posts drew the most likes, dislikes and comments;
/// `null` when none drew any.
pub async fn most_active_friend(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Option<RankedProfile>>, BackendError> {
    let friends = active_friends(state.store.as_ref(), me.id).await?;
    let ids: Vec<Uuid> = friends.iter().map(|u| u.id).collect();
    let ranking = rank_by_activity(state.store.as_ref(), &ids, None).await?;
    Ok(Json(leader(&state, &friends, ranking)))
}

/// GET /api/friends/suggestions
pub async fn friend_suggestions(
    State(state): State<AppState>,
    AuthUser(me): AuthUser,
) -> Result<Json<Vec<UserProfile>>, BackendError> {
    let ids = suggest_friends(state.store.as_ref(), me.id).await?;
    let users = state.store.users_by_ids(&ids).await?;
    let ttl = state.config.status_ttl();

    let profiles: Vec<UserProfile> = ids
        .iter()
        .filter_map(|id| users.iter().find(|u| u.id == *id && !u.deactivated))
        .map(|u| u.to_profile(ttl))
        .collect();

    tracing::debug!("{} suggestions for {}", profiles.len(), me.username);
    Ok(Json(profiles))
}
