//! User entity model and DTOs.

use heirloom_core::chat::ChatParticipant;
use heirloom_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row joined with its role name.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    /// Resolved role name (`"Buyer"` or `"Seller"`).
    pub role: String,
    pub created_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub email: String,
    pub role: String,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl User {
    /// Public identity shown to other chat participants.
    pub fn participant(&self) -> ChatParticipant {
        ChatParticipant {
            id: self.id,
            email: self.email.clone(),
            role: self.role.clone(),
        }
    }
}

/// DTO for creating a new user. `password_hash` is already hashed.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    /// Role name; must exist in the `roles` table.
    pub role: String,
}
