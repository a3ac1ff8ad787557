/**
 * Posts
 *
 * A post embeds its reactions and its comment tree: likes and dislikes are
 * sets of user ids, each comment carries its own reactions and a flat list
 * of replies.
 *
 * Mutations are described by [`PostMutation`] and applied with
 * [`Post::apply`], which enforces the reaction invariant (a user id never
 * sits in both the likes and dislikes of one entity) and reports how the
 * post-level engagement changed so the owner's activity counter can follow.
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Who may see a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    Public,
    #[default]
    Friends,
    Private,
}

impl Privacy {
    pub const ALL: [Privacy; 3] = [Privacy::Public, Privacy::Friends, Privacy::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Friends => "friends",
            Privacy::Private => "private",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Privacy::Public),
            "friends" => Some(Privacy::Friends),
            "private" => Some(Privacy::Private),
            _ => None,
        }
    }
}

/// Like or dislike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Like,
    Dislike,
}

/// A reply to a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub id: Uuid,
    pub text: String,
    pub posted_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Reply {
    pub fn new(posted_by: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            posted_by,
            created_at: Utc::now(),
        }
    }
}

/// A comment on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub posted_by: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub dislikes: Vec<Uuid>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Comment {
    pub fn new(posted_by: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            posted_by,
            created_at: Utc::now(),
            likes: Vec::new(),
            dislikes: Vec::new(),
            replies: Vec::new(),
        }
    }
}

/// A post with its embedded reactions and comment tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub media: Option<String>,
    pub privacy: Privacy,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: Vec<Uuid>,
    #[serde(default)]
    pub dislikes: Vec<Uuid>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A change to a post's reactions or comment tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostMutation {
    /// Set (or with `None`, clear) a user's reaction to the post
    React {
        user: Uuid,
        reaction: Option<Reaction>,
    },
    /// Append a comment
    Comment { comment: Comment },
    /// Remove a comment; allowed for its author and the post owner
    DeleteComment { actor: Uuid, comment_id: Uuid },
    /// Set a user's reaction to a comment
    ReactToComment {
        user: Uuid,
        comment_id: Uuid,
        reaction: Reaction,
    },
    /// Append a reply to a comment
    Reply { comment_id: Uuid, reply: Reply },
}

/// Why a mutation could not be applied
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("Comment not found")]
    CommentNotFound,

    #[error("Only the comment author or the post owner can delete this comment")]
    NotPermitted,
}

impl Post {
    pub fn new(
        user_id: Uuid,
        content: impl Into<String>,
        media: Option<String>,
        privacy: Privacy,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content: content.into(),
            media,
            privacy,
            created_at: Utc::now(),
            likes: Vec::new(),
            dislikes: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Post-level engagement: likes + dislikes + comments
    pub fn engagement(&self) -> i64 {
        (self.likes.len() + self.dislikes.len() + self.comments.len()) as i64
    }

    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    /// Apply a mutation in place.
    ///
    /// Returns the change in [`Post::engagement`] so callers can move the
    /// owner's activity counter by exactly the same amount. A failed
    /// mutation leaves the post untouched.
    pub fn apply(&mut self, mutation: &PostMutation) -> Result<i64, PostError> {
        let before = self.engagement();

        match mutation {
            PostMutation::React { user, reaction } => {
                set_reaction(&mut self.likes, &mut self.dislikes, *user, *reaction);
            }
            PostMutation::Comment { comment } => {
                self.comments.push(comment.clone());
            }
            PostMutation::DeleteComment { actor, comment_id } => {
                let index = self
                    .comments
                    .iter()
                    .position(|c| c.id == *comment_id)
                    .ok_or(PostError::CommentNotFound)?;
                if self.comments[index].posted_by != *actor && self.user_id != *actor {
                    return Err(PostError::NotPermitted);
                }
                self.comments.remove(index);
            }
            PostMutation::ReactToComment {
                user,
                comment_id,
                reaction,
            } => {
                let comment = self.comment_mut(*comment_id)?;
                set_reaction(&mut comment.likes, &mut comment.dislikes, *user, Some(*reaction));
            }
            PostMutation::Reply { comment_id, reply } => {
                self.comment_mut(*comment_id)?.replies.push(reply.clone());
            }
        }

        Ok(self.engagement() - before)
    }

    fn comment_mut(&mut self, comment_id: Uuid) -> Result<&mut Comment, PostError> {
        self.comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or(PostError::CommentNotFound)
    }
}

fn set_reaction(
    likes: &mut Vec<Uuid>,
    dislikes: &mut Vec<Uuid>,
    user: Uuid,
    reaction: Option<Reaction>,
) {
    likes.retain(|id| *id != user);
    dislikes.retain(|id| *id != user);
    match reaction {
        Some(Reaction::Like) => likes.push(user),
        Some(Reaction::Dislike) => dislikes.push(user),
        None => {}
    }
}

/// Request body for creating a post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub media: Option<String>,
    pub privacy: Option<Privacy>,
}

/// Request body for comments and replies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}
