//! Repository for the `messages` table.

use heirloom_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{ConversationSummary, CreateMessage, MessageWithSender};

/// Enriched column list; expects `m` (messages), `u` (sender), `r` (role).
const ENRICHED_COLUMNS: &str = "m.id, m.listing_id, m.sender_id, m.receiver_id, m.message, \
                                m.created_at, u.email AS sender_email, r.name AS sender_role";

/// Provides persistence for listing chat messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message and return it joined with the sender's identity.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMessage,
    ) -> Result<MessageWithSender, sqlx::Error> {
        let query = format!(
            "WITH m AS (
                INSERT INTO messages (listing_id, sender_id, receiver_id, message)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {ENRICHED_COLUMNS}
             FROM m
             JOIN users u ON u.id = m.sender_id
             JOIN roles r ON r.id = u.role_id"
        );
        sqlx::query_as::<_, MessageWithSender>(&query)
            .bind(input.listing_id)
            .bind(input.sender_id)
            .bind(input.receiver_id)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// The most recent `limit` messages for a listing, oldest first.
    pub async fn recent_for_listing(
        pool: &PgPool,
        listing_id: DbId,
        limit: i64,
    ) -> Result<Vec<MessageWithSender>, sqlx::Error> {
        let query = format!(
            "SELECT * FROM (
                SELECT {ENRICHED_COLUMNS}
                FROM messages m
                JOIN users u ON u.id = m.sender_id
                JOIN roles r ON r.id = u.role_id
                WHERE m.listing_id = $1
                ORDER BY m.created_at DESC, m.id DESC
                LIMIT $2
             ) recent
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, MessageWithSender>(&query)
            .bind(listing_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Every buyer the seller has exchanged messages with on a listing,
    /// most recently active first.
    pub async fn conversations_for_seller(
        pool: &PgPool,
        listing_id: DbId,
        seller_id: DbId,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConversationSummary>(
            "SELECT c.buyer_id,
                    u.email AS buyer_email,
                    COUNT(*) AS message_count,
                    MAX(c.created_at) AS last_message_at
             FROM (
                SELECT CASE WHEN m.sender_id = $2 THEN m.receiver_id ELSE m.sender_id END AS buyer_id,
                       m.created_at
                FROM messages m
                WHERE m.listing_id = $1 AND (m.sender_id = $2 OR m.receiver_id = $2)
             ) c
             JOIN users u ON u.id = c.buyer_id
             WHERE c.buyer_id <> $2
             GROUP BY c.buyer_id, u.email
             ORDER BY last_message_at DESC",
        )
        .bind(listing_id)
        .bind(seller_id)
        .fetch_all(pool)
        .await
    }
}
