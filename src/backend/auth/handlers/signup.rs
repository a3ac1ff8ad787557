/**
 * Signup Handler
 *
 * This module implements the user registration handler for POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate every profile field
 * 2. Hash password using bcrypt
 * 3. Create the user (the store rejects duplicate usernames and emails)
 * 4. Log the verification link, or create the user verified when
 *    verification is switched off
 * 5. Return a JWT token and the new account
 *
 * # Validation
 *
 * - Username: 3-30 chars, starts with a letter, letters, digits and underscores
 * - Email must look like `local@domain.tld`
 * - Password must be at least 8 characters long
 * - First and last name: letters and spaces only
 * - Occupation, bio and profile picture must not be empty
 */

use axum::{extract::State, response::Json};
use bcrypt::hash;

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest};
use crate::backend::auth::sessions::{create_token, random_token};
use crate::backend::auth::users::NewUser;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;
use crate::backend::store::UserStore;
use crate::shared::SharedError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
pub(crate) fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    // First character must be a letter
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    // Rest can be alphanumeric or underscore
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Basic `local@domain.tld` shape check
pub(crate) fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

/// Letters and spaces, with at least one letter
pub(crate) fn is_valid_name(name: &str) -> bool {
    name.chars().any(char::is_alphabetic) && name.chars().all(|c| c.is_alphabetic() || c == ' ')
}

pub(crate) fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(SharedError::validation(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    Ok(())
}

/// Trimmed value of a required free-text field
pub(crate) fn required_text(field: &'static str, value: &str) -> Result<String, SharedError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SharedError::validation(field, format!("{} must not be empty", field)));
    }
    Ok(value.to_string())
}

fn validate(request: &SignupRequest) -> Result<(), SharedError> {
    if !is_valid_username(&request.username) {
        return Err(SharedError::validation(
            "username",
            "Username must be 3-30 chars, start with a letter, and contain only letters, \
             numbers, and underscores",
        ));
    }
    if !is_valid_email(&request.email) {
        return Err(SharedError::validation("email", "Invalid email format"));
    }
    validate_password(&request.password)?;
    if !is_valid_name(&request.first_name) {
        return Err(SharedError::validation(
            "first_name",
            "First name may contain only letters and spaces",
        ));
    }
    if !is_valid_name(&request.last_name) {
        return Err(SharedError::validation(
            "last_name",
            "Last name may contain only letters and spaces",
        ));
    }
    required_text("occupation", &request.occupation)?;
    required_text("bio", &request.bio)?;
    required_text("profile_picture", &request.profile_picture)?;
    Ok(())
}

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - If any field fails validation
/// * `409 Conflict` - If the username or email is already registered
/// * `500 Internal Server Error` - If hashing, storage or token generation fails
///
/// # Example Request
///
/// ```http
/// POST /api/auth/signup HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "email": "alice@example.com",
///   "password": "securepassword123",
///   "first_name": "Alice",
///   "last_name": "Liddell",
///   "occupation": "Writer",
///   "bio": "Curious",
///   "profile_picture": "alice.png"
/// }
/// ```
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    tracing::info!("Signup request for username: {}, email: {}", request.username, request.email);

    if let Err(e) = validate(&request) {
        tracing::warn!("Signup rejected for {}: {}", request.username, e);
        return Err(e.into());
    }

    let password_hash = hash(&request.password, state.config.bcrypt_cost)?;

    let verified = !state.config.require_email_verification;
    let verification_token = (!verified).then(random_token);

    let user = state
        .store
        .insert_user(NewUser {
            username: request.username,
            email: request.email.trim().to_lowercase(),
            password_hash,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            occupation: request.occupation.trim().to_string(),
            bio: request.bio.trim().to_string(),
            profile_picture: request.profile_picture.trim().to_string(),
            verified,
            verification_token,
        })
        .await
        .inspect_err(|e| tracing::warn!("Failed to create user: {}", e))?;

    if let Some(token) = &user.verification_token {
        tracing::info!(
            "Verification link for {}: {}",
            user.username,
            state.config.link(&format!("/api/auth/verify/{}", token))
        );
    }

    let token = create_token(
        user.id,
        &user.username,
        user.role,
        &state.config.jwt_secret,
        state.config.token_ttl_days,
    )?;

    tracing::info!("User created successfully: {} ({})", user.username, user.email);

    Ok(Json(AuthResponse {
        token,
        user: user.to_account_view(state.config.status_ttl()),
    }))
}
