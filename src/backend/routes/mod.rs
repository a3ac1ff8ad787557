//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Router assembly, layers, health check, fallback
//! └── api_routes.rs   - The `/api` route table
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use socialnet::backend::routes::create_router;
//! use socialnet::backend::server::{AppConfig, AppState};
//! use socialnet::backend::store::MemoryStore;
//!
//! let config = AppConfig::builder().build().unwrap();
//! let router = create_router(AppState::new(Arc::new(MemoryStore::new()), config));
//! ```

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

// Re-export commonly used functions
pub use api_routes::configure_api_routes;
pub use router::{create_router, health, HealthResponse};
