//! Chat message entity model and DTOs.

use heirloom_core::chat::{ChatMessage, ChatParticipant};
use heirloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A message row joined with the sender's public identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MessageWithSender {
    pub id: DbId,
    pub listing_id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub message: String,
    pub created_at: Timestamp,
    pub sender_email: String,
    pub sender_role: String,
}

impl From<MessageWithSender> for ChatMessage {
    fn from(row: MessageWithSender) -> Self {
        ChatMessage {
            id: row.id,
            listing_id: row.listing_id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            message: row.message,
            created_at: row.created_at,
            sender: ChatParticipant {
                id: row.sender_id,
                email: row.sender_email,
                role: row.sender_role,
            },
        }
    }
}

/// One buyer's thread with the seller on a listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationSummary {
    pub buyer_id: DbId,
    pub buyer_email: String,
    pub message_count: i64,
    pub last_message_at: Timestamp,
}

/// DTO for inserting a chat message. `message` is already trimmed.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessage {
    pub listing_id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub message: String,
}
