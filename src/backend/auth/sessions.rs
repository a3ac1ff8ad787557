/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 * Tokens are HS256-signed with the configured secret.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::Role;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

/// Create a JWT token for a user
///
/// # Arguments
/// * `user_id` - User ID (UUID)
/// * `username` - Username, carried for clients
/// * `role` - Account role at issue time
/// * `secret` - Signing secret
/// * `ttl_days` - Lifetime of the token
pub fn create_token(
    user_id: Uuid,
    username: &str,
    role: Role,
    secret: &str,
    ttl_days: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp().max(0) as u64;
    let exp = now.saturating_add((ttl_days.max(0) as u64).saturating_mul(24 * 60 * 60));

    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        exp,
        iat: now,
    };

    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &key, &Validation::default())?;
    Ok(token_data.claims)
}

/// Random single-use token for email verification and password reset links
pub fn random_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
