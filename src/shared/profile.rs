//! User profile views and roles.
//!
//! The server never serializes its `User` row directly. It projects it into a
//! [`UserProfile`] (what anyone may see) or an [`AccountView`] (what the
//! account owner sees about themselves).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Public profile of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub occupation: String,
    pub bio: String,
    pub profile_picture: String,
    /// Present only while the status is fresh
    pub status: Option<String>,
    pub post_count: i64,
    pub friend_count: i64,
    pub activity: i64,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The account owner's own view: the public profile plus private fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub email: String,
    pub verified: bool,
    pub deactivated: bool,
}

/// A profile paired with the score it was ranked by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedProfile {
    pub user: UserProfile,
    pub score: i64,
}

/// Body for the single-field profile updates (bio, occupation, picture)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateFieldRequest {
    pub value: String,
}

/// Body for setting the status line; an empty string clears it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request body for changing another user's role
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}
