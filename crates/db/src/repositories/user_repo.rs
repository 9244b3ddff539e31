//! Repository for the `users` table.

use heirloom_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries; expects `users u JOIN roles r`.
const COLUMNS: &str = "u.id, u.email, u.password_hash, r.name AS role, u.created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Returns `None` if `input.role` does not name a known role.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "WITH u AS (
                INSERT INTO users (email, password_hash, role_id)
                SELECT $1, $2, id FROM roles WHERE name = $3
                RETURNING *
             )
             SELECT {COLUMNS} FROM u JOIN roles r ON r.id = u.role_id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users u JOIN roles r ON r.id = u.role_id WHERE u.email = $1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}
