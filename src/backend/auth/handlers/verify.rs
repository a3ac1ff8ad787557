//! Email verification
//!
//! GET /api/auth/verify/{token} confirms the address a user signed up with.
//! The token is single-use: verifying clears it.

use axum::{
    extract::{Path, State},
    response::Json,
};

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::{UserStore, UserUpdate};

pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<MessageResponse>, BackendError> {
    let user = state
        .store
        .user_by_verification_token(&token)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Unknown verification token");
            BackendError::not_found("Verification link is invalid or already used")
        })?;

    state.store.update_user(user.id, UserUpdate::Verified).await?;
    tracing::info!("Email verified for {}", user.username);

    Ok(Json(MessageResponse::new("Email verified")))
}
