//! Authentication Module
//!
//! This module handles user authentication, registration, and session management.
//! It provides HTTP handlers for authentication endpoints and manages user data
//! and JWT tokens.
//!
//! # Architecture
//!
//! The auth module is organized into focused submodules:
//!
//! - **`users`** - User data model and database operations
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - User model and the PostgreSQL UserStore
//! ├── sessions.rs     - JWT token management
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: User provides profile and password → User created (unverified) →
//!    verification link logged
//! 2. **Verify**: User follows the link → account marked verified
//! 3. **Login**: Username or email plus password → Credentials verified → JWT token returned
//! 4. **Get Me**: User provides JWT token → Token verified → Account view returned
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - JWT tokens are used for stateless authentication
//! - Tokens expire after `TOKEN_TTL_DAYS` (30 by default)
//! - Invalid credentials return 401 (no information leakage)

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used types and handlers
pub use handlers::types::{AuthResponse, LoginRequest, SignupRequest};
pub use handlers::{forgot_password, get_me, login, reset_password, signup, verify_email};
pub use users::{NewUser, User};
