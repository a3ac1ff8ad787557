//! Account Module
//!
//! Profile maintenance for the signed-in user and the public profile pages.
//!
//! - **`handlers`** - `/api/account/*` and `/api/users/{username}` handlers

/// HTTP handlers for profile maintenance and public profiles
pub mod handlers;

pub use handlers::{
    change_password, deactivate_self, get_profile, get_profile_posts, set_status, update_bio,
    update_occupation, update_profile_picture,
};
pub(crate) use handlers::{active_user, active_user_by_name};
