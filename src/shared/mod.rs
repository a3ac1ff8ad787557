//! Shared Module
//!
//! Types and data structures shared between the server and its clients.
//! Everything here is serializable and free of server dependencies, so a
//! client crate can depend on it to speak the API.

/// Shared error types
pub mod error;

/// User profiles and roles
pub mod profile;

/// Friendship edges and friend-request payloads
pub mod friendship;

/// Posts, comments, replies, and reactions
pub mod post;

/// Direct messaging types
pub mod messaging;

/// Pagination parameters
pub mod pagination;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use friendship::{Friendship, FriendshipStatus};
pub use messaging::{DirectMessage, MessageStatus};
pub use pagination::{Page, Pagination};
pub use post::{Comment, Post, PostError, PostMutation, Privacy, Reaction, Reply};
pub use profile::{AccountView, RankedProfile, Role, UserProfile};
