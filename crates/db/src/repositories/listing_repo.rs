//! Repository for the `listings` table.

use heirloom_core::status::ListingStatus;
use heirloom_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::listing::{CreateListing, Listing, ListingDetail, UpdateListing};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, seller_id, category_id, title, description, price, condition, \
                       year, images, status_id, created_at, updated_at";

/// Joined select for [`ListingDetail`]; callers append `WHERE` / `ORDER BY`.
const DETAIL_SELECT: &str = "SELECT l.id, l.seller_id, l.category_id, l.title, l.description, \
            l.price, l.condition, l.year, l.images, l.status_id, l.created_at, l.updated_at, \
            u.email AS seller_email, r.name AS seller_role, \
            c.name AS category_name, c.icon AS category_icon \
     FROM listings l \
     JOIN users u ON u.id = l.seller_id \
     JOIN roles r ON r.id = u.role_id \
     LEFT JOIN categories c ON c.id = l.category_id";

/// Provides CRUD operations for listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Insert a new listing (always `available`), returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateListing) -> Result<Listing, sqlx::Error> {
        let query = format!(
            "INSERT INTO listings
                (seller_id, category_id, title, description, price, condition, year, images, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(input.seller_id)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.condition)
            .bind(input.year)
            .bind(&input.images)
            .bind(ListingStatus::Available.id())
            .fetch_one(pool)
            .await
    }

    /// Find a listing by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a listing by ID and take a row lock until the transaction ends.
    ///
    /// Every offer mutation locks its listing first, which serializes
    /// create/accept/reject for the same listing.
    pub async fn lock_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM listings WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a listing with seller and category fields.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<ListingDetail>, sqlx::Error> {
        let query = format!("{DETAIL_SELECT} WHERE l.id = $1");
        sqlx::query_as::<_, ListingDetail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List available listings, newest first, optionally filtered by
    /// category name.
    pub async fn list_available(
        pool: &PgPool,
        category: Option<&str>,
    ) -> Result<Vec<ListingDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT}
             WHERE l.status_id = $1 AND ($2::TEXT IS NULL OR c.name = $2)
             ORDER BY l.created_at DESC, l.id DESC"
        );
        sqlx::query_as::<_, ListingDetail>(&query)
            .bind(ListingStatus::Available.id())
            .bind(category)
            .fetch_all(pool)
            .await
    }

    /// List every listing owned by a seller, newest first.
    pub async fn list_by_seller(
        pool: &PgPool,
        seller_id: DbId,
    ) -> Result<Vec<ListingDetail>, sqlx::Error> {
        let query = format!(
            "{DETAIL_SELECT} WHERE l.seller_id = $1 ORDER BY l.created_at DESC, l.id DESC"
        );
        sqlx::query_as::<_, ListingDetail>(&query)
            .bind(seller_id)
            .fetch_all(pool)
            .await
    }

    /// Update a seller's own listing. Only non-`None` fields in `input` are
    /// applied; status is never touched.
    ///
    /// Returns `None` if no listing with `id` belongs to `seller_id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        seller_id: DbId,
        input: &UpdateListing,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!(
            "UPDATE listings SET
                category_id = COALESCE($3, category_id),
                title = COALESCE($4, title),
                description = COALESCE($5, description),
                price = COALESCE($6, price),
                condition = COALESCE($7, condition),
                year = COALESCE($8, year),
                images = COALESCE($9, images)
             WHERE id = $1 AND seller_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(seller_id)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.condition)
            .bind(input.year)
            .bind(&input.images)
            .fetch_optional(pool)
            .await
    }

    /// Delete a seller's own listing (offers and messages cascade).
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId, seller_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1 AND seller_id = $2")
            .bind(id)
            .bind(seller_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move an available listing to `sold`. Returns `true` if the row changed.
    pub async fn mark_sold<'e>(executor: impl PgExecutor<'e>, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE listings SET status_id = $2 WHERE id = $1 AND status_id = $3")
            .bind(id)
            .bind(ListingStatus::Sold.id())
            .bind(ListingStatus::Available.id())
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
