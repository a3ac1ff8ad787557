/**
 * Password Reset Handlers
 *
 * - POST /api/auth/forgot-password issues a one-hour reset token for a known,
 *   verified account and logs the reset link. It always answers 200 so the
 *   endpoint cannot be used to discover which emails are registered.
 * - POST /api/auth/reset-password swaps in a new password for a valid,
 *   unexpired token and clears the token.
 */

use axum::{extract::State, response::Json};
use bcrypt::hash;
use chrono::{Duration, Utc};

use crate::backend::auth::handlers::signup::validate_password;
use crate::backend::auth::handlers::types::{
    ForgotPasswordRequest, MessageResponse, ResetPasswordRequest,
};
use crate::backend::auth::sessions::random_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::{UserStore, UserUpdate};

/// Lifetime of a password reset token
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

const RESET_ACK: &str = "If that account exists, a reset link has been sent";

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    let email = request.email.trim().to_lowercase();

    match state.store.user_by_email(&email).await? {
        Some(user) if user.verified && !user.deactivated => {
            let token = random_token();
            state
                .store
                .update_user(
                    user.id,
                    UserUpdate::ResetToken {
                        token: token.clone(),
                        expires_at: Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
                    },
                )
                .await?;
            tracing::info!(
                "Password reset link for {}: {}",
                user.username,
                state.config.link(&format!("/reset-password?token={}", token))
            );
        }
        _ => tracing::warn!("Password reset requested for unknown or inactive email"),
    }

    Ok(Json(MessageResponse::new(RESET_ACK)))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, BackendError> {
    validate_password(&request.password)?;

    let user = state
        .store
        .user_by_reset_token(&request.token)
        .await?
        .filter(|u| u.reset_token_expires_at.is_some_and(|at| at > Utc::now()))
        .ok_or_else(|| {
            tracing::warn!("Invalid or expired reset token");
            BackendError::bad_request("Reset link is invalid or has expired")
        })?;

    let password_hash = hash(&request.password, state.config.bcrypt_cost)?;
    state
        .store
        .update_user(user.id, UserUpdate::ResetPassword(password_hash))
        .await?;

    tracing::info!("Password reset for {}", user.username);
    Ok(Json(MessageResponse::new("Password updated")))
}
