//! Direct messages between friends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Delivery status of a direct message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Pending,
    Delivered,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Delivered => "delivered",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(MessageStatus::Pending),
            "delivered" => Some(MessageStatus::Delivered),
            _ => None,
        }
    }
}

/// A message from one user to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub body: String,
    pub status: MessageStatus,
    pub created_at: DateTime<Utc>,
}

impl DirectMessage {
    pub fn new(sender_id: Uuid, receiver_id: Uuid, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            body: body.into(),
            status: MessageStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// The other participant from `user`'s point of view
    pub fn peer_of(&self, user: Uuid) -> Uuid {
        if self.sender_id == user {
            self.receiver_id
        } else {
            self.sender_id
        }
    }
}

/// Request body for sending a message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}

/// One entry in the conversation list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub peer_id: Uuid,
    pub last_message: DirectMessage,
    /// Messages from the peer the caller has not yet read
    pub pending_count: i64,
}
