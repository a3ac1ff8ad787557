//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Configuration loading from the environment
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `AppConfig::from_env`
//! 2. **Store Selection**: PostgreSQL or the in-memory store
//! 3. **Router Creation**: Configures all routes and middleware
//! 4. **Background Tasks**: Prunes idle message channels

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError};
pub use init::create_app;
pub use state::{AppState, MessagingBroadcastState};
