//! Social graph resolution.

use std::collections::HashSet;

use uuid::Uuid;

use crate::backend::auth::users::User;
use crate::backend::store::{FriendshipStore, StoreResult, UserStore};
use crate::shared::FriendshipStatus;

/// Active accepted friends of `user_id`, as full user rows.
///
/// Counterparts that are deactivated or no longer exist are dropped. The
/// result is ordered by username.
pub async fn active_friends<S>(store: &S, user_id: Uuid) -> StoreResult<Vec<User>>
where
    S: UserStore + FriendshipStore + ?Sized,
{
    let edges = store
        .friendships_of(user_id, Some(FriendshipStatus::Accepted))
        .await?;

    let mut seen = HashSet::new();
    let counterparts: Vec<Uuid> = edges
        .iter()
        .filter_map(|edge| edge.counterpart(user_id))
        .filter(|id| *id != user_id && seen.insert(*id))
        .collect();

    let mut friends: Vec<User> = store
        .users_by_ids(&counterparts)
        .await?
        .into_iter()
        .filter(|u| !u.deactivated)
        .collect();
    friends.sort_by(|a, b| a.username.cmp(&b.username));

    tracing::debug!(user_id = %user_id, friends = friends.len(), "Resolved friends");
    Ok(friends)
}

/// The set of active accepted friends of `user_id`
pub async fn resolve_friends<S>(store: &S, user_id: Uuid) -> StoreResult<HashSet<Uuid>>
where
    S: UserStore + FriendshipStore + ?Sized,
{
    Ok(active_friends(store, user_id)
        .await?
        .into_iter()
        .map(|u| u.id)
        .collect())
}
