//! Middleware Module
//!
//! Request-processing layers and extractors that run before handlers.
//!
//! - **`auth`** - `AuthUser` / `AdminUser` extractors protecting routes

pub mod auth;

pub use auth::{authenticate, AdminUser, AuthUser};
