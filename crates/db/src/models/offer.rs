//! Offer entity model and DTOs.

use heirloom_core::conversation::OfferSnapshot;
use heirloom_core::offer::RankedOffer;
use heirloom_core::status::{OfferStatus, StatusId};
use heirloom_core::types::{DbId, MinorUnits, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::{listing_status_name, offer_status_name};

/// A row from the `offers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Offer {
    pub id: DbId,
    pub listing_id: DbId,
    pub buyer_id: DbId,
    pub quoted_price: MinorUnits,
    #[serde(rename = "status", serialize_with = "offer_status_name")]
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Offer {
    /// Typed status, or `None` if the row holds an unknown status id.
    pub fn status(&self) -> Option<OfferStatus> {
        OfferStatus::from_id(self.status_id)
    }

    /// The fields the conversation resolver needs. Rows with an unknown
    /// status id are skipped by the caller.
    pub fn snapshot(&self) -> Option<OfferSnapshot> {
        self.status().map(|status| OfferSnapshot {
            id: self.id,
            buyer_id: self.buyer_id,
            status,
            created_at: self.created_at,
        })
    }
}

impl RankedOffer for Offer {
    fn offer_id(&self) -> DbId {
        self.id
    }
    fn quoted_price(&self) -> MinorUnits {
        self.quoted_price
    }
    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Offer joined with the buyer's public identity (seller's offer board).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OfferWithBuyer {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub offer: Offer,
    pub buyer_email: String,
    pub buyer_role: String,
}

impl RankedOffer for OfferWithBuyer {
    fn offer_id(&self) -> DbId {
        self.offer.id
    }
    fn quoted_price(&self) -> MinorUnits {
        self.offer.quoted_price
    }
    fn created_at(&self) -> Timestamp {
        self.offer.created_at
    }
}

/// Offer joined with a summary of its listing (buyer's "my offers" view).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OfferWithListing {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub offer: Offer,
    pub listing_title: String,
    pub listing_price: MinorUnits,
    pub listing_images: Vec<String>,
    #[serde(serialize_with = "listing_status_name")]
    pub listing_status_id: StatusId,
}

/// DTO for inserting a new offer. New offers are always `pending`.
#[derive(Debug, Deserialize)]
pub struct CreateOffer {
    pub listing_id: DbId,
    pub buyer_id: DbId,
    pub quoted_price: MinorUnits,
}
