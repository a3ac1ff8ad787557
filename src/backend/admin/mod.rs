//! Administration Module
//!
//! Account management for users with the admin role.

pub mod handlers;

pub use handlers::{deactivate_user, reactivate_user, reconcile_counters, set_role};
