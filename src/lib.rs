//! Socialnet - Main Library
//!
//! Socialnet is the backend of a small social network: accounts, friendships,
//! posts with nested comments and replies, direct messages, and JWT
//! authentication, served as a JSON API over Axum.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire and domain types (users, friendships, posts,
//!   messages) with no server dependencies
//! - **`backend`** - The Axum server: stores, the social-graph core,
//!   handlers, routing, auth, and configuration
//!
//! # Usage
//!
//! ```rust,no_run
//! use socialnet::backend::server::{config::AppConfig, init::create_app};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await?;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::SharedError` for validation failures
//! - `backend::store::StoreError` for persistence failures
//! - `backend::error::BackendError` for everything surfaced over HTTP

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
