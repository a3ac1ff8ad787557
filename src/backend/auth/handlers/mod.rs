//! Authentication Handlers Module
//!
//! This module contains all HTTP handlers for authentication endpoints.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── signup.rs   - User registration handler and field validation
//! ├── login.rs    - User authentication handler
//! ├── verify.rs   - Email verification handler
//! ├── password.rs - Forgot / reset password handlers
//! └── me.rs       - Get current user handler
//! ```
//!
//! # Handlers
//!
//! - **`signup`** - POST /api/auth/signup - User registration
//! - **`verify_email`** - GET /api/auth/verify/{token} - Confirm email address
//! - **`login`** - POST /api/auth/login - User authentication
//! - **`forgot_password`** - POST /api/auth/forgot-password - Issue reset token
//! - **`reset_password`** - POST /api/auth/reset-password - Set a new password
//! - **`get_me`** - GET /api/auth/me - Get current user info

/// Request and response types
pub mod types;

/// Signup handler
pub mod signup;

/// Login handler
pub mod login;

/// Email verification handler
pub mod verify;

/// Password reset handlers
pub mod password;

/// Get current user handler
pub mod me;

// Re-export commonly used types
pub use types::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, ResetPasswordRequest,
    SignupRequest,
};

// Re-export handlers
pub use login::login;
pub use me::get_me;
pub use password::{forgot_password, reset_password};
pub use signup::signup;
pub use verify::verify_email;
