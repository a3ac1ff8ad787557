//! Messaging Module
//!
//! Direct messages between friends, with live delivery over SSE.
//!
//! - **`db`** - PostgreSQL `MessageStore`
//! - **`handlers`** - send, thread and conversation list
//! - **`stream`** - per-user Server-Sent-Events stream

pub mod db;
pub mod handlers;
pub mod stream;

pub use handlers::*;
pub use stream::message_stream;
