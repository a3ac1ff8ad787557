//! Friendship edges
//!
//! A friendship is an undirected relationship stored as a directed record:
//! `user1` sent the request and `user2` received it. Only `user2` may accept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::UserProfile;

/// Friendship lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendshipStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
            FriendshipStatus::Rejected => "rejected",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(FriendshipStatus::Pending),
            "accepted" => Some(FriendshipStatus::Accepted),
            "rejected" => Some(FriendshipStatus::Rejected),
            _ => None,
        }
    }
}

/// A friendship record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendship {
    pub id: Uuid,
    /// Requester
    pub user1: Uuid,
    /// Recipient
    pub user2: Uuid,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    /// A new pending request from `from` to `to`
    pub fn request(from: Uuid, to: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user1: from,
            user2: to,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn involves(&self, user: Uuid) -> bool {
        self.user1 == user || self.user2 == user
    }

    /// The other side of the edge, if `user` is on it
    pub fn counterpart(&self, user: Uuid) -> Option<Uuid> {
        if self.user1 == user {
            Some(self.user2)
        } else if self.user2 == user {
            Some(self.user1)
        } else {
            None
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == FriendshipStatus::Accepted
    }

    /// Whether this edge joins exactly `a` and `b`, in either direction
    pub fn joins(&self, a: Uuid, b: Uuid) -> bool {
        (self.user1 == a && self.user2 == b) || (self.user1 == b && self.user2 == a)
    }
}

/// How the caller relates to another user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// The caller is looking at themselves
    Yourself,
    None,
    /// The caller sent a request that is still pending
    RequestSent,
    /// The other user sent the caller a request that is still pending
    RequestReceived,
    Friends,
}

/// Request body for sending a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFriendRequestRequest {
    pub user_id: Uuid,
}

/// Pending requests, split by direction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PendingRequestsResponse {
    pub incoming: Vec<UserProfile>,
    pub outgoing: Vec<UserProfile>,
}

/// Relation status between the caller and another user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationResponse {
    pub user_id: Uuid,
    pub relation: Relation,
}
