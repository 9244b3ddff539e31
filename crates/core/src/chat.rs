//! Listing chat protocol: room naming, limits, and the WebSocket event
//! envelope.
//!
//! Frames are JSON objects of the form `{"event": "<name>", "data": {...}}`
//! with camelCase payload fields, so the browser client can route on the
//! event name.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{DbId, Timestamp};

/// Maximum number of messages delivered as room history on join.
pub const HISTORY_LIMIT: i64 = 100;

/// Maximum length of a single chat message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Room identifier for a listing's chat.
pub fn room_id(listing_id: DbId) -> String {
    format!("listing-{listing_id}")
}

/// Trim and validate a chat message body.
pub fn validate_message_text(text: &str) -> Result<&str, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err("Message must not be empty".to_string());
    }
    let len = trimmed.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(format!(
            "Message must be at most {MAX_MESSAGE_CHARS} characters, got {len}"
        ));
    }
    Ok(trimmed)
}

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

/// Public identity of a chat participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatParticipant {
    pub id: DbId,
    pub email: String,
    pub role: String,
}

/// A persisted chat message enriched with its sender's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: DbId,
    pub listing_id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub message: String,
    pub created_at: Timestamp,
    pub sender: ChatParticipant,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Events sent by a browser client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    JoinChat {
        #[serde(deserialize_with = "flexible_id")]
        listing_id: DbId,
        #[serde(deserialize_with = "flexible_id")]
        user_id: DbId,
    },
    SendMessage {
        #[serde(deserialize_with = "flexible_id")]
        listing_id: DbId,
        #[serde(deserialize_with = "flexible_id")]
        sender_id: DbId,
        #[serde(deserialize_with = "flexible_id")]
        receiver_id: DbId,
        message: String,
    },
    Typing {
        #[serde(deserialize_with = "flexible_id")]
        listing_id: DbId,
        #[serde(deserialize_with = "flexible_id")]
        user_id: DbId,
    },
    StopTyping {
        #[serde(deserialize_with = "flexible_id")]
        listing_id: DbId,
        #[serde(deserialize_with = "flexible_id")]
        user_id: DbId,
    },
}

/// Events pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    ChatHistory(Vec<ChatMessage>),
    NewMessage(ChatMessage),
    MessageError { message: String },
    UserTyping { user_id: DbId },
    UserStopTyping { user_id: DbId },
}

impl ServerEvent {
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::MessageError {
            message: message.into(),
        }
    }

    /// Serialize to the JSON text of a WebSocket frame.
    pub fn to_json(&self) -> String {
        // Every variant is plain data; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Accept ids as JSON numbers or numeric strings (route params arrive as
/// strings from the browser).
fn flexible_id<'de, D>(deserializer: D) -> Result<DbId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(DbId),
        Str(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Num(n) => Ok(n),
        Repr::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id '{s}'"))),
    }
}
