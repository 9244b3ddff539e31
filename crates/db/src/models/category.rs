//! Category entity model.

use heirloom_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `categories` table (seeded by migration).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub icon: Option<String>,
}
