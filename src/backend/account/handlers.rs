/**
 * Account Handlers
 *
 * Every `/api/account` route acts on the caller's own account only. The
 * `/api/users/{username}` routes show another user's public profile and
 * the posts of theirs the caller may see.
 */

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use bcrypt::{hash, verify};
use chrono::Utc;
use uuid::Uuid;

use crate::backend::auth::handlers::signup::{required_text, validate_password};
use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::social::{readable_posts, Viewer};
use crate::backend::store::{PostQuery, PostStore, UserStore, UserUpdate};
use crate::shared::profile::{
    ChangePasswordRequest, SetStatusRequest, UpdateFieldRequest,
};
use crate::shared::{AccountView, Pagination, Post, UserProfile};

/// An existing, active user by id; anything else is a 404
pub(crate) async fn active_user(state: &AppState, id: Uuid) -> Result<User, BackendError> {
    match state.store.user_by_id(id).await? {
        Some(user) if !user.deactivated => Ok(user),
        _ => {
            tracing::warn!("User {} not found or deactivated", id);
            Err(BackendError::not_found("User not found"))
        }
    }
}

/// An existing, active user by username; anything else is a 404
pub(crate) async fn active_user_by_name(
    state: &AppState,
    username: &str,
) -> Result<User, BackendError> {
    match state.store.user_by_username(username).await? {
        Some(user) if !user.deactivated => Ok(user),
        _ => {
            tracing::warn!("User {} not found or deactivated", username);
            Err(BackendError::not_found("User not found"))
        }
    }
}

async fn apply_update(
    state: &AppState,
    user: &User,
    update: UserUpdate,
) -> Result<Json<AccountView>, BackendError> {
    let updated = state.store.update_user(user.id, update).await?;
    Ok(Json(updated.to_account_view(state.config.status_ttl())))
}

/// PUT /api/account/bio
pub async fn update_bio(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateFieldRequest>,
) -> Result<Json<AccountView>, BackendError> {
    let bio = required_text("bio", &request.value)?;
    tracing::info!("Updating bio for {}", user.username);
    apply_update(&state, &user, UserUpdate::Bio(bio)).await
}

/// PUT /api/account/occupation
pub async fn update_occupation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateFieldRequest>,
) -> Result<Json<AccountView>, BackendError> {
    let occupation = required_text("occupation", &request.value)?;
    tracing::info!("Updating occupation for {}", user.username);
    apply_update(&state, &user, UserUpdate::Occupation(occupation)).await
}

/// PUT /api/account/profile-picture
pub async fn update_profile_picture(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateFieldRequest>,
) -> Result<Json<AccountView>, BackendError> {
    let picture = required_text("profile_picture", &request.value)?;
    tracing::info!("Updating profile picture for {}", user.username);
    apply_update(&state, &user, UserUpdate::ProfilePicture(picture)).await
}

/// PUT /api/account/status
///
/// The status is shown for `STATUS_TTL_HOURS` after it is set. An empty
/// status clears it immediately.
pub async fn set_status(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<AccountView>, BackendError> {
    let text = request.status.trim();
    let text = (!text.is_empty()).then(|| text.to_string());
    tracing::info!("Setting status for {} (cleared: {})", user.username, text.is_none());
    apply_update(
        &state,
        &user,
        UserUpdate::Status {
            text,
            changed_at: Utc::now(),
        },
    )
    .await
}

/// PUT /api/account/password
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    if !verify(&request.current_password, &user.password_hash)? {
        tracing::warn!("Wrong current password for {}", user.username);
        return Err(BackendError::unauthorized("Current password is incorrect"));
    }
    validate_password(&request.new_password)?;

    let password_hash = hash(&request.new_password, state.config.bcrypt_cost)?;
    state
        .store
        .update_user(user.id, UserUpdate::PasswordHash(password_hash))
        .await?;

    tracing::info!("Password changed for {}", user.username);
    Ok(Json(MessageResponse::new("Password updated")))
}

/// POST /api/account/deactivate
pub async fn deactivate_self(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, BackendError> {
    state
        .store
        .update_user(user.id, UserUpdate::Deactivated(true))
        .await?;
    tracing::info!("User {} deactivated their account", user.username);
    Ok(Json(MessageResponse::new("Account deactivated")))
}

/// GET /api/users/{username}
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(_viewer): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<UserProfile>, BackendError> {
    let user = active_user_by_name(&state, &username).await?;
    Ok(Json(user.to_profile(state.config.status_ttl())))
}

/// GET /api/users/{username}/posts
///
/// The owner sees all their posts, friends see public and friends-only
/// posts, everyone else sees public posts.
pub async fn get_profile_posts(
    State(state): State<AppState>,
    AuthUser(viewer): AuthUser,
    Path(username): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Vec<Post>>, BackendError> {
    let owner = active_user_by_name(&state, &username).await?;
    let viewer = Viewer::resolve(state.store.as_ref(), viewer.id).await?;

    let query = PostQuery {
        owners: Some(vec![owner.id]),
        exclude_owners: Vec::new(),
        privacy: viewer.allowed_privacy(owner.id),
        always_include: None,
        page: pagination.page(),
    };
    let posts = state.store.query_posts(&query).await?;
    let posts = readable_posts(state.store.as_ref(), &viewer, posts).await?;

    tracing::debug!("Returning {} posts of {} to {}", posts.len(), owner.username, viewer.id);
    Ok(Json(posts))
}
