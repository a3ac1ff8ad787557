//! Shared Error Types
//!
//! Error types that make sense on both sides of the wire, chiefly input
//! validation failures.
//!
//! # Usage
//!
//! ```rust
//! use socialnet::shared::error::SharedError;
//!
//! let error = SharedError::validation("email", "Invalid email format");
//! assert!(error.to_string().contains("email"));
//! ```
use thiserror::Error;

/// Shared error types that can occur in both clients and the server
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}
