/**
 * Get Current User Handler
 *
 * GET /api/auth/me returns the authenticated caller's own account view:
 * the public profile plus email, verification and deactivation flags.
 * The token is checked by the `AuthUser` extractor.
 */

use axum::{extract::State, response::Json};

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::AccountView;

/// Get current user handler
///
/// # Errors
///
/// * `401 Unauthorized` - If the Authorization header is missing or the token is invalid
/// * `403 Forbidden` - If the account is deactivated
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<AccountView>, BackendError> {
    tracing::debug!("Fetching account for {}", user.username);
    Ok(Json(user.to_account_view(state.config.status_ttl())))
}
