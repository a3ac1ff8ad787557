/**
 * Administration Handlers
 *
 * Role-gated (`AdminUser`) account management: deactivate and reactivate
 * users, change roles, and rebuild a user's denormalized counters from the
 * posts and friendships they actually have.
 *
 * An administrator cannot deactivate themselves or change their own role
 * through these routes.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::middleware::AdminUser;
use crate::backend::server::state::AppState;
use crate::backend::store::{Counters, FriendshipStore, PostStore, UserStore, UserUpdate};
use crate::shared::profile::SetRoleRequest;
use crate::shared::{AccountView, FriendshipStatus};

async fn any_user(state: &AppState, id: Uuid) -> Result<User, BackendError> {
    state
        .store
        .user_by_id(id)
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))
}

fn not_self(admin: &User, target: Uuid) -> Result<(), BackendError> {
    if admin.id == target {
        tracing::warn!("Admin {} targeted their own account", admin.username);
        return Err(BackendError::bad_request(
            "Administrators cannot change their own account here",
        ));
    }
    Ok(())
}

async fn set_deactivated(
    state: &AppState,
    admin: &User,
    user_id: Uuid,
    deactivated: bool,
) -> Result<Json<AccountView>, BackendError> {
    not_self(admin, user_id)?;
    let target = any_user(state, user_id).await?;
    let updated = state
        .store
        .update_user(target.id, UserUpdate::Deactivated(deactivated))
        .await?;

    tracing::info!(
        "Admin {} set deactivated={} on {}",
        admin.username,
        deactivated,
        updated.username
    );
    Ok(Json(updated.to_account_view(state.config.status_ttl())))
}

/// POST /api/admin/users/{user_id}/deactivate
pub async fn deactivate_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AccountView>, BackendError> {
    set_deactivated(&state, &admin, user_id, true).await
}

/// POST /api/admin/users/{user_id}/reactivate
pub async fn reactivate_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<AccountView>, BackendError> {
    set_deactivated(&state, &admin, user_id, false).await
}

/// PUT /api/admin/users/{user_id}/role
pub async fn set_role(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<AccountView>, BackendError> {
    not_self(&admin, user_id)?;
    let target = any_user(&state, user_id).await?;
    let updated = state
        .store
        .update_user(target.id, UserUpdate::Role(request.role))
        .await?;

    tracing::info!(
        "Admin {} set role {} on {}",
        admin.username,
        request.role.as_str(),
        updated.username
    );
    Ok(Json(updated.to_account_view(state.config.status_ttl())))
}

/// POST /api/admin/users/{user_id}/reconcile
///
/// Recomputes `post_count`, `friend_count` and `activity` from ground truth
/// and overwrites the stored counters.
pub async fn reconcile_counters(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Counters>, BackendError> {
    let target = any_user(&state, user_id).await?;

    let stats = state
        .store
        .engagement_stats(&[target.id])
        .await?
        .remove(&target.id)
        .unwrap_or_default();
    let friends = state
        .store
        .friendships_of(target.id, Some(FriendshipStatus::Accepted))
        .await?;

    let counters = Counters {
        post_count: stats.post_count,
        friend_count: friends.len() as i64,
        activity: stats.engagement,
    };
    state.store.set_counters(target.id, counters).await?;

    if counters.post_count != target.post_count
        || counters.friend_count != target.friend_count
        || counters.activity != target.activity
    {
        tracing::warn!(
            "Counter drift on {}: posts {} -> {}, friends {} -> {}, activity {} -> {}",
            target.username,
            target.post_count,
            counters.post_count,
            target.friend_count,
            counters.friend_count,
            target.activity,
            counters.activity
        );
    }
    tracing::info!("Admin {} reconciled counters of {}", admin.username, target.username);
    Ok(Json(counters))
}
