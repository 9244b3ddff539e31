//! Domain rules for the Heirloom marketplace.
//!
//! Zero internal dependencies: the repository layer, the HTTP handlers and
//! the chat hub all share these types and checks.

pub mod account;
pub mod chat;
pub mod conversation;
pub mod error;
pub mod listing;
pub mod offer;
pub mod roles;
pub mod status;
pub mod types;
