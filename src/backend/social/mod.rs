//! Social Graph Core
//!
//! The part of the backend that reasons about the social graph rather than
//! moving rows around:
//!
//! - **`graph`** - resolves a user's active accepted friends
//! - **`ranking`** - orders candidates by engagement or post count
//! - **`suggest`** - bounded friend-of-friend suggestions
//! - **`visibility`** - privacy checks, scrubbing of inactive contributors,
//!   and the single read path every post-returning endpoint goes through
//!
//! Everything here is generic over the store traits, so the same code runs
//! against Postgres in production and the memory store in tests. Nothing is
//! cached; each call reads the store afresh.

pub mod graph;
pub mod ranking;
pub mod suggest;
pub mod visibility;

pub use graph::{active_friends, resolve_friends};
pub use ranking::{rank_by_activity, rank_by_post_count, RankedUser};
pub use suggest::{suggest_friends, MAX_SUGGESTIONS};
pub use visibility::{is_visible, readable_posts, scrub, Viewer};
