//! Property-based tests for post mutations

use proptest::prelude::*;
use socialnet::shared::{Comment, Post, PostMutation, Privacy, Reaction};
use uuid::Uuid;

fn reaction() -> impl Strategy<Value = Option<Reaction>> {
    prop_oneof![
        Just(None),
        Just(Some(Reaction::Like)),
        Just(Some(Reaction::Dislike)),
    ]
}

proptest! {
    #[test]
    fn test_reactions_stay_exclusive(
        steps in prop::collection::vec((0usize..4, reaction()), 0..40),
    ) {
        let users: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let mut post = Post::new(Uuid::new_v4(), "post", None, Privacy::Public);
        let mut last = vec![None; users.len()];

        for (index, reaction) in steps {
            let before = post.engagement();
            let delta = post
                .apply(&PostMutation::React { user: users[index], reaction })
                .unwrap();
            prop_assert_eq!(post.engagement() - before, delta);
            last[index] = reaction;
        }

        for (user, reaction) in users.iter().zip(&last) {
            let likes = post.likes.iter().filter(|id| *id == user).count();
            let dislikes = post.dislikes.iter().filter(|id| *id == user).count();
            prop_assert!(likes + dislikes <= 1);
            prop_assert_eq!(likes == 1, *reaction == Some(Reaction::Like));
            prop_assert_eq!(dislikes == 1, *reaction == Some(Reaction::Dislike));
        }
    }

    #[test]
    fn test_comment_reactions_do_not_move_engagement(
        steps in prop::collection::vec((0usize..4, any::<bool>()), 1..20),
    ) {
        let users: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let mut post = Post::new(Uuid::new_v4(), "post", None, Privacy::Public);
        let comment = Comment::new(users[0], "comment");
        let comment_id = comment.id;
        prop_assert_eq!(post.apply(&PostMutation::Comment { comment }).unwrap(), 1);

        for (index, like) in steps {
            let reaction = if like { Reaction::Like } else { Reaction::Dislike };
            let delta = post
                .apply(&PostMutation::ReactToComment {
                    user: users[index],
                    comment_id,
                    reaction,
                })
                .unwrap();
            prop_assert_eq!(delta, 0);
        }

        let comment = post.comment(comment_id).unwrap();
        prop_assert!(comment.likes.len() + comment.dislikes.len() <= users.len());
    }
}
