//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Joined read models where handlers need related identity columns

pub mod category;
pub mod listing;
pub mod message;
pub mod offer;
pub mod status;
pub mod user;
