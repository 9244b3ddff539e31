use crate::types::DbId;

/// Why a marketplace operation was refused.
///
/// The offer engine and conversation resolver return these; the API layer
/// maps each variant onto one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A listing, offer, category or user id that does not resolve.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Bad input: a non-positive offer amount, an empty chat message, an
    /// unknown role or status string.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request is well formed but the listing or offer is in the wrong
    /// state, e.g. a second pending offer or deciding a settled one.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing, expired or unverifiable credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Signed in, but not the buyer or seller this action belongs to.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Storage or hashing failure. The message is logged, never shown.
    #[error("Internal error: {0}")]
    Internal(String),
}
