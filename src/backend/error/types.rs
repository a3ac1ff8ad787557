/**
 * Backend Error Types
 *
 * This module defines the error type returned by every HTTP handler.
 *
 * # Error Categories
 *
 * ## Handler Errors
 *
 * Raised directly by handlers with an explicit status:
 * - Invalid input (400)
 * - Missing or invalid credentials (401)
 * - Not allowed for this caller (403)
 * - Missing user, post or friendship (404)
 * - Duplicate user or friendship (409)
 *
 * ## Store Errors
 *
 * Wrapped from `StoreError`. `NotFound` and `Conflict` keep their meaning;
 * refused post mutations become 404/403; everything else is a 500 whose
 * details are logged, not returned.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::{PostError, SharedError};

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use socialnet::backend::error::BackendError;
/// use axum::http::StatusCode;
///
/// let err = BackendError::not_found("User not found");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Persistence failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Shared error (from shared module)
    ///
    /// Validation failures surface as 400.
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Token signing failure
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::handler(StatusCode::CONFLICT, message)
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Store` - 404 / 409 / 403 where the store says so, else 500
    /// - `SharedError` - 400 Bad Request
    /// - `Hashing`, `Token` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Store(err) => match err {
                StoreError::NotFound(_) => StatusCode::NOT_FOUND,
                StoreError::Conflict(_) => StatusCode::CONFLICT,
                StoreError::Post(PostError::CommentNotFound) => StatusCode::NOT_FOUND,
                StoreError::Post(PostError::NotPermitted) => StatusCode::FORBIDDEN,
                StoreError::Database(_) | StoreError::Migration(_) | StoreError::Corrupt { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::SharedError(SharedError::ValidationError { .. }) => StatusCode::BAD_REQUEST,
            Self::Hashing(_) | Self::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    ///
    /// Server-side failures get a generic message; the detail is only logged.
    pub fn message(&self) -> String {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            return "Internal server error".to_string();
        }
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::SharedError(SharedError::ValidationError { message, .. }) => message.clone(),
            other => other.to_string(),
        }
    }
}
