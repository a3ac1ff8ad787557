/**
 * Post Visibility
 *
 * Decides who may see a post and strips contributions from accounts that
 * are deactivated or gone. [`readable_posts`] is the one read path: every
 * endpoint that returns posts passes them through it, so the privacy rule
 * and the scrub are applied in exactly one place.
 */

use std::collections::HashSet;

use uuid::Uuid;

use super::graph::resolve_friends;
use crate::backend::store::{FriendshipStore, StoreResult, UserStore};
use crate::shared::{Post, Privacy};

/// A viewer and their active friends, resolved once per request
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub id: Uuid,
    pub friends: HashSet<Uuid>,
}

impl Viewer {
    pub async fn resolve<S>(store: &S, id: Uuid) -> StoreResult<Self>
    where
        S: UserStore + FriendshipStore + ?Sized,
    {
        Ok(Self {
            id,
            friends: resolve_friends(store, id).await?,
        })
    }

    /// Privacy levels this viewer may see on `owner`'s posts
    pub fn allowed_privacy(&self, owner: Uuid) -> Vec<Privacy> {
        if owner == self.id {
            Privacy::ALL.to_vec()
        } else if self.friends.contains(&owner) {
            vec![Privacy::Public, Privacy::Friends]
        } else {
            vec![Privacy::Public]
        }
    }
}

/// Whether `viewer` may see `post`.
///
/// The owner sees everything, accepted friends see `public` and `friends`,
/// everyone else only `public`.
pub fn is_visible(viewer: &Viewer, post: &Post) -> bool {
    viewer.allowed_privacy(post.user_id).contains(&post.privacy)
}

/// Every user id that contributed to `post`, owner excluded
pub fn contributors(post: &Post) -> HashSet<Uuid> {
    let mut ids: HashSet<Uuid> = post.likes.iter().chain(&post.dislikes).copied().collect();
    for comment in &post.comments {
        ids.insert(comment.posted_by);
        ids.extend(comment.likes.iter().chain(&comment.dislikes).copied());
        ids.extend(comment.replies.iter().map(|r| r.posted_by));
    }
    ids
}

/// Drop every reaction, comment and reply whose author is not in `active`.
///
/// Removing a comment removes its replies with it.
pub fn scrub(mut post: Post, active: &HashSet<Uuid>) -> Post {
    let keep = |id: &Uuid| active.contains(id);

    post.likes.retain(keep);
    post.dislikes.retain(keep);
    post.comments.retain(|c| active.contains(&c.posted_by));
    for comment in &mut post.comments {
        comment.likes.retain(keep);
        comment.dislikes.retain(keep);
        comment.replies.retain(|r| active.contains(&r.posted_by));
    }
    post
}

/// The shared read path for posts.
///
/// Drops posts whose owner is deactivated or missing, drops posts `viewer`
/// may not see, and scrubs what remains. Input order is preserved.
pub async fn readable_posts<S>(
    store: &S,
    viewer: &Viewer,
    posts: Vec<Post>,
) -> StoreResult<Vec<Post>>
where
    S: UserStore + ?Sized,
{
    let mut ids: HashSet<Uuid> = HashSet::new();
    for post in &posts {
        ids.insert(post.user_id);
        ids.extend(contributors(post));
    }
    let ids: Vec<Uuid> = ids.into_iter().collect();

    let active: HashSet<Uuid> = store
        .users_by_ids(&ids)
        .await?
        .into_iter()
        .filter(|u| !u.deactivated)
        .map(|u| u.id)
        .collect();

    Ok(posts
        .into_iter()
        .filter(|post| active.contains(&post.user_id) && is_visible(viewer, post))
        .map(|post| scrub(post, &active))
        .collect())
}
