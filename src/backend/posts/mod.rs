//! Posts Module
//!
//! Posts, their reactions and their comment trees.
//!
//! - **`db`** - PostgreSQL `PostStore`
//! - **`handlers`** - `/api/posts/*` handlers

pub mod db;
pub mod handlers;

pub use handlers::*;
