/**
 * Authentication Extractors
 *
 * Protects routes that require a signed-in user. The `AuthUser` extractor
 * reads the `Authorization: Bearer <token>` header, verifies the JWT, loads
 * the account and rejects it if it no longer exists or is deactivated.
 * `AdminUser` additionally requires the admin role.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::auth::users::User;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;

/// Pull the bearer token out of the request headers
pub fn bearer_token(parts: &Parts) -> Result<&str, BackendError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Authorization header");
            BackendError::unauthorized("Missing Authorization header")
        })?;

    // Extract token (format: "Bearer <token>")
    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::warn!("Invalid Authorization header format");
        BackendError::unauthorized("Invalid Authorization header format")
    })
}

/// Resolve the request's token to an active user
pub async fn authenticate(parts: &Parts, state: &AppState) -> Result<User, BackendError> {
    let token = bearer_token(parts)?;

    let claims = verify_token(token, &state.config.jwt_secret).map_err(|e| {
        tracing::warn!("Invalid token: {:?}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Invalid user ID in token: {:?}", e);
        BackendError::unauthorized("Invalid or expired token")
    })?;

    let user = state.store.user_by_id(user_id).await?.ok_or_else(|| {
        tracing::warn!("Token for unknown user {}", user_id);
        BackendError::unauthorized("User no longer exists")
    })?;

    if user.deactivated {
        tracing::warn!("Deactivated user {} attempted access", user.username);
        return Err(BackendError::forbidden("Account is deactivated"));
    }

    Ok(user)
}

/// Axum extractor for the signed-in, active user
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await.map(AuthUser)
    }
}

/// Axum extractor for a signed-in administrator
#[derive(Clone, Debug)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!("Non-admin {} attempted an admin action", user.username);
            return Err(BackendError::forbidden("Administrator role required"));
        }
        Ok(AdminUser(user))
    }
}
