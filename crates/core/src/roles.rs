//! Well-known role name constants.
//!
//! These must match the seed data in `20260301000001_create_users.sql`.
//! A user's role is fixed at registration.

pub const ROLE_BUYER: &str = "Buyer";
pub const ROLE_SELLER: &str = "Seller";

/// Every role a user may register with.
pub const VALID_ROLES: &[&str] = &[ROLE_BUYER, ROLE_SELLER];

/// Validate that a role name is one of the accepted values (case-sensitive).
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Role must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}
