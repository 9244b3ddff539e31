//! Repository for the `offers` table.

use heirloom_core::status::OfferStatus;
use heirloom_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::offer::{CreateOffer, Offer, OfferWithBuyer, OfferWithListing};
use crate::repositories::ListingRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, listing_id, buyer_id, quoted_price, status_id, created_at, updated_at";

/// Same columns qualified with the `o` alias for joined queries.
const O_COLUMNS: &str = "o.id, o.listing_id, o.buyer_id, o.quoted_price, o.status_id, \
                         o.created_at, o.updated_at";

/// Provides CRUD and lifecycle operations for offers.
pub struct OfferRepo;

impl OfferRepo {
    /// Insert a new `pending` offer, returning the created row.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateOffer,
    ) -> Result<Offer, sqlx::Error> {
        let query = format!(
            "INSERT INTO offers (listing_id, buyer_id, quoted_price, status_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(input.listing_id)
            .bind(input.buyer_id)
            .bind(input.quoted_price)
            .bind(OfferStatus::Pending.id())
            .fetch_one(executor)
            .await
    }

    /// Find an offer by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM offers WHERE id = $1");
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Whether `buyer_id` currently has a pending offer on `listing_id`.
    pub async fn has_pending<'e>(
        executor: impl PgExecutor<'e>,
        listing_id: DbId,
        buyer_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM offers WHERE listing_id = $1 AND buyer_id = $2 AND status_id = $3
             )",
        )
        .bind(listing_id)
        .bind(buyer_id)
        .bind(OfferStatus::Pending.id())
        .fetch_one(executor)
        .await?;
        Ok(exists.0)
    }

    /// All offers on a listing in creation order.
    pub async fn list_by_listing(pool: &PgPool, listing_id: DbId) -> Result<Vec<Offer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM offers WHERE listing_id = $1 ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }

    /// All offers on a listing with buyer identity, in creation order.
    /// Display ranking is applied by the caller.
    pub async fn list_with_buyer(
        pool: &PgPool,
        listing_id: DbId,
    ) -> Result<Vec<OfferWithBuyer>, sqlx::Error> {
        let query = format!(
            "SELECT {O_COLUMNS}, u.email AS buyer_email, r.name AS buyer_role
             FROM offers o
             JOIN users u ON u.id = o.buyer_id
             JOIN roles r ON r.id = u.role_id
             WHERE o.listing_id = $1
             ORDER BY o.created_at ASC, o.id ASC"
        );
        sqlx::query_as::<_, OfferWithBuyer>(&query)
            .bind(listing_id)
            .fetch_all(pool)
            .await
    }

    /// A buyer's own offers with listing summaries, newest first.
    pub async fn list_by_buyer(
        pool: &PgPool,
        buyer_id: DbId,
    ) -> Result<Vec<OfferWithListing>, sqlx::Error> {
        let query = format!(
            "SELECT {O_COLUMNS},
                    l.title AS listing_title,
                    l.price AS listing_price,
                    l.images AS listing_images,
                    l.status_id AS listing_status_id
             FROM offers o
             JOIN listings l ON l.id = o.listing_id
             WHERE o.buyer_id = $1
             ORDER BY o.created_at DESC, o.id DESC"
        );
        sqlx::query_as::<_, OfferWithListing>(&query)
            .bind(buyer_id)
            .fetch_all(pool)
            .await
    }

    /// Move a `pending` offer to `status`.
    ///
    /// Returns `None` if the offer does not exist or is no longer pending.
    pub async fn settle<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        status: OfferStatus,
    ) -> Result<Option<Offer>, sqlx::Error> {
        let query = format!(
            "UPDATE offers SET status_id = $2
             WHERE id = $1 AND status_id = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Offer>(&query)
            .bind(id)
            .bind(status.id())
            .bind(OfferStatus::Pending.id())
            .fetch_optional(executor)
            .await
    }

    /// Reject every pending offer on `listing_id` except `keep_id`.
    ///
    /// Returns the number of offers rejected.
    pub async fn reject_pending_siblings<'e>(
        executor: impl PgExecutor<'e>,
        listing_id: DbId,
        keep_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE offers SET status_id = $3
             WHERE listing_id = $1 AND id <> $2 AND status_id = $4",
        )
        .bind(listing_id)
        .bind(keep_id)
        .bind(OfferStatus::Rejected.id())
        .bind(OfferStatus::Pending.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Accept an offer and close its listing: accept `offer_id`, reject its
    /// pending siblings, mark the listing sold.
    ///
    /// Must run inside a transaction that already holds the listing's row
    /// lock. Returns the accepted offer and the number of siblings rejected.
    pub async fn accept_and_close_listing(
        conn: &mut PgConnection,
        offer_id: DbId,
        listing_id: DbId,
    ) -> Result<(Offer, u64), sqlx::Error> {
        let accepted = Self::settle(&mut *conn, offer_id, OfferStatus::Accepted)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let rejected = Self::reject_pending_siblings(&mut *conn, listing_id, offer_id).await?;

        if !ListingRepo::mark_sold(&mut *conn, listing_id).await? {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok((accepted, rejected))
    }
}
