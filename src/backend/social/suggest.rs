//! Friend suggestions
//!
//! A two-hop walk with branching factor three: the user's three most active
//! friends, then each of their three most active friends. Results keep
//! encounter order.

use std::collections::HashSet;

use uuid::Uuid;

use super::graph::resolve_friends;
use super::ranking::rank_by_activity;
use crate::backend::store::{FriendshipStore, PostStore, StoreResult, UserStore};

/// Friends taken at each hop
pub const BRANCHING: usize = 3;

/// Upper bound on suggestions returned
pub const MAX_SUGGESTIONS: usize = BRANCHING * BRANCHING;

/// Up to nine users `user_id` is not yet friends with
pub async fn suggest_friends<S>(store: &S, user_id: Uuid) -> StoreResult<Vec<Uuid>>
where
    S: UserStore + FriendshipStore + PostStore + ?Sized,
{
    let friends = resolve_friends(store, user_id).await?;
    if friends.is_empty() {
        return Ok(Vec::new());
    }

    let friend_ids: Vec<Uuid> = friends.iter().copied().collect();
    let closest = rank_by_activity(store, &friend_ids, Some(BRANCHING)).await?;

    let mut seen = HashSet::new();
    let mut suggestions = Vec::with_capacity(MAX_SUGGESTIONS);
    for friend in closest {
        let second_hop: Vec<Uuid> = resolve_friends(store, friend.user_id)
            .await?
            .into_iter()
            .collect();
        let ranked = rank_by_activity(store, &second_hop, Some(BRANCHING)).await?;

        for candidate in ranked {
            let id = candidate.user_id;
            if id != user_id && !friends.contains(&id) && seen.insert(id) {
                suggestions.push(id);
            }
        }
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    tracing::debug!(user_id = %user_id, count = suggestions.len(), "Computed friend suggestions");
    Ok(suggestions)
}
