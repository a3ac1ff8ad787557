//! Backend Module
//!
//! All server-side code for the socialnet service: an Axum HTTP server over
//! a pluggable store, with the social graph core in `social`.
//!
//! # Architecture
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`auth`** - Users, JWT sessions, signup / login / verification handlers
//! - **`middleware`** - `AuthUser` and `AdminUser` extractors
//! - **`error`** - `BackendError` and its HTTP response mapping
//! - **`store`** - Store traits with PostgreSQL and in-memory implementations
//! - **`social`** - Friend resolution, ranking, suggestions, post visibility
//! - **`friendship`**, **`posts`**, **`messaging`**, **`account`**, **`admin`**
//!   - Feature handlers and their PostgreSQL queries
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Binary entry point
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── middleware/     - Request extractors
//! ├── error/          - Error types
//! ├── store/          - Persistence traits and backends
//! ├── social/         - Social graph core
//! ├── friendship/     - Friend requests
//! ├── posts/          - Posts, reactions, comments
//! ├── messaging/      - Direct messages and live stream
//! ├── account/        - Profile maintenance
//! └── admin/          - Administration
//! ```
//!
//! # State Management
//!
//! Handlers share an `AppState` holding the store behind
//! `Arc<dyn SocialStore>`, the loaded `AppConfig`, and the per-user
//! broadcast channels that feed the live message stream.
//!
//! # Error Handling
//!
//! Handlers return `Result<Json<T>, BackendError>`; store and validation
//! errors convert with `?` and render as `{"error": ..., "status": ...}`.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

/// Authentication and user management
pub mod auth;

/// Request extractors
pub mod middleware;

/// Persistence traits and implementations
pub mod store;

/// Social graph core
pub mod social;

/// Friend requests and friend-derived views
pub mod friendship;

/// Posts and engagement
pub mod posts;

/// Direct messaging
pub mod messaging;

/// Profile maintenance and public profiles
pub mod account;

/// Administration
pub mod admin;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::create_app;
