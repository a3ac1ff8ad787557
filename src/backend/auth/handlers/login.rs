/**
 * Login Handler
 *
 * This module implements the user authentication handler for POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email (when the login contains '@') or by username
 * 2. Verify password using bcrypt
 * 3. Refuse unverified or deactivated accounts
 * 4. Return a JWT token and the account view
 *
 * Unknown users and wrong passwords both answer 401 with the same message.
 */

use axum::{extract::State, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::sessions::create_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `403 Forbidden` - If the email is not verified or the account is deactivated
/// * `500 Internal Server Error` - If the store or token generation fails
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let login = request.login.trim();
    tracing::info!("Login request for: {}", login);

    let user = if login.contains('@') {
        state.store.user_by_email(&login.to_lowercase()).await?
    } else {
        state.store.user_by_username(login).await?
    };

    let user = user.ok_or_else(|| {
        tracing::warn!("User not found: {}", login);
        BackendError::unauthorized(INVALID_CREDENTIALS)
    })?;

    if !verify(&request.password, &user.password_hash)? {
        tracing::warn!("Invalid password for user: {}", login);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    if !user.verified {
        tracing::warn!("Unverified user attempted login: {}", user.username);
        return Err(BackendError::forbidden("Email address is not verified"));
    }

    if user.deactivated {
        tracing::warn!("Deactivated user attempted login: {}", user.username);
        return Err(BackendError::forbidden("Account is deactivated"));
    }

    let token = create_token(
        user.id,
        &user.username,
        user.role,
        &state.config.jwt_secret,
        state.config.token_ttl_days,
    )?;

    tracing::info!("User logged in successfully: {} ({})", user.username, user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.to_account_view(state.config.status_ttl()),
    }))
}
