//! Repository for the `categories` table.

use sqlx::PgPool;

use crate::models::category::Category;

pub struct CategoryRepo;

impl CategoryRepo {
    /// List all categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name, icon FROM categories ORDER BY name")
            .fetch_all(pool)
            .await
    }

    /// Find a category by exact name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name, icon FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
