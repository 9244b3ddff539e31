//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Read-only helpers take `&PgPool`; methods that participate in the offer
//! lifecycle transaction accept any [`sqlx::PgExecutor`] so they can run on
//! `&mut *tx`.

pub mod category_repo;
pub mod listing_repo;
pub mod message_repo;
pub mod offer_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use listing_repo::ListingRepo;
pub use message_repo::MessageRepo;
pub use offer_repo::OfferRepo;
pub use user_repo::UserRepo;
