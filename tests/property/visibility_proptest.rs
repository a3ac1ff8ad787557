//! Property-based tests for post visibility and scrubbing

use std::collections::HashSet;

use proptest::prelude::*;
use socialnet::backend::social::{is_visible, scrub, Viewer};
use socialnet::shared::{Comment, Post, Privacy, Reply};
use uuid::Uuid;

fn privacy() -> impl Strategy<Value = Privacy> {
    prop_oneof![
        Just(Privacy::Public),
        Just(Privacy::Friends),
        Just(Privacy::Private),
    ]
}

/// A post with one like and one comment thread per pick
fn populated_post(users: &[Uuid], picks: &[(usize, usize, usize)]) -> Post {
    let mut post = Post::new(users[0], "post", None, Privacy::Public);
    for &(liker, commenter, replier) in picks {
        post.likes.push(users[liker]);
        let mut comment = Comment::new(users[commenter], "comment");
        comment.dislikes.push(users[liker]);
        comment.replies.push(Reply::new(users[replier], "reply"));
        post.comments.push(comment);
    }
    post
}

proptest! {
    #[test]
    fn test_visibility_by_relationship(privacy in privacy()) {
        let owner = Uuid::new_v4();
        let friend = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let post = Post::new(owner, "post", None, privacy);

        let as_owner = Viewer { id: owner, friends: HashSet::from([friend]) };
        let as_friend = Viewer { id: friend, friends: HashSet::from([owner]) };
        let as_stranger = Viewer { id: stranger, friends: HashSet::new() };

        prop_assert!(is_visible(&as_owner, &post));
        prop_assert_eq!(is_visible(&as_friend, &post), privacy != Privacy::Private);
        prop_assert_eq!(is_visible(&as_stranger, &post), privacy == Privacy::Public);
    }

    #[test]
    fn test_scrub_keeps_only_active_contributors(
        picks in prop::collection::vec((0usize..5, 0usize..5, 0usize..5), 0..10),
        active_mask in prop::collection::vec(any::<bool>(), 5),
    ) {
        let users: Vec<Uuid> = (0..5).map(|_| Uuid::new_v4()).collect();
        let active: HashSet<Uuid> = users
            .iter()
            .zip(&active_mask)
            .filter(|(_, keep)| **keep)
            .map(|(id, _)| *id)
            .collect();

        let post = populated_post(&users, &picks);
        let expected_comments = post
            .comments
            .iter()
            .filter(|c| active.contains(&c.posted_by))
            .count();

        let scrubbed = scrub(post, &active);

        prop_assert_eq!(scrubbed.comments.len(), expected_comments);
        prop_assert!(scrubbed.likes.iter().all(|id| active.contains(id)));
        for comment in &scrubbed.comments {
            prop_assert!(active.contains(&comment.posted_by));
            prop_assert!(comment.dislikes.iter().all(|id| active.contains(id)));
            prop_assert!(comment.replies.iter().all(|r| active.contains(&r.posted_by)));
        }
    }
}
