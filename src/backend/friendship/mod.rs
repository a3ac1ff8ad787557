//! Friendship Module
//!
//! Friend requests and the friend-derived views.
//!
//! - **`db`** - PostgreSQL `FriendshipStore`
//! - **`handlers`** - `/api/friends/*` handlers

pub mod db;
pub mod handlers;

pub use handlers::*;
