//! Listing entity model and DTOs.

use heirloom_core::status::{ListingStatus, StatusId};
use heirloom_core::types::{DbId, MinorUnits, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::listing_status_name;

/// A row from the `listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub seller_id: DbId,
    pub category_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub price: MinorUnits,
    pub condition: String,
    pub year: Option<i32>,
    /// Ordered image paths resolved by the file storage collaborator.
    pub images: Vec<String>,
    #[serde(rename = "status", serialize_with = "listing_status_name")]
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Listing {
    /// Typed status, or `None` if the row holds an unknown status id.
    pub fn status(&self) -> Option<ListingStatus> {
        ListingStatus::from_id(self.status_id)
    }
}

/// Listing joined with seller identity and category display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ListingDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub listing: Listing,
    pub seller_email: String,
    pub seller_role: String,
    pub category_name: Option<String>,
    pub category_icon: Option<String>,
}

/// DTO for creating a new listing. New listings are always `available`.
#[derive(Debug, Deserialize)]
pub struct CreateListing {
    pub seller_id: DbId,
    pub category_id: Option<DbId>,
    pub title: String,
    pub description: String,
    pub price: MinorUnits,
    pub condition: String,
    pub year: Option<i32>,
    pub images: Vec<String>,
}

/// DTO for editing a listing. All fields are optional; status is not
/// editable here (it only changes when an offer is accepted).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateListing {
    pub category_id: Option<DbId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<MinorUnits>,
    pub condition: Option<String>,
    pub year: Option<i32>,
    pub images: Option<Vec<String>>,
}
