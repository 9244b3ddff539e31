//! Message persistence seam for the chat hub.

use async_trait::async_trait;
use heirloom_core::chat::ChatMessage;
use heirloom_core::types::DbId;
use heirloom_db::models::message::CreateMessage;
use heirloom_db::repositories::MessageRepo;
use heirloom_db::DbPool;

use crate::error::AppResult;

/// Storage used by [`ChatHub`](super::ChatHub) for history and new messages.
///
/// Lets the hub run against an in-memory store in tests.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// The most recent `limit` messages on a listing, oldest first.
    async fn recent(&self, listing_id: DbId, limit: i64) -> AppResult<Vec<ChatMessage>>;

    /// Persist a message and return it with the sender's identity.
    async fn append(&self, input: CreateMessage) -> AppResult<ChatMessage>;
}

/// Postgres-backed store over [`MessageRepo`].
pub struct PgMessageStore {
    pool: DbPool,
}

impl PgMessageStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn recent(&self, listing_id: DbId, limit: i64) -> AppResult<Vec<ChatMessage>> {
        let rows = MessageRepo::recent_for_listing(&self.pool, listing_id, limit).await?;
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }

    async fn append(&self, input: CreateMessage) -> AppResult<ChatMessage> {
        let row = MessageRepo::create(&self.pool, &input).await?;
        Ok(row.into())
    }
}
