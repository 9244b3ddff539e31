//! Serde helpers that render SMALLINT status columns as their wire names.

use heirloom_core::status::{ListingStatus, OfferStatus, StatusId};
use serde::Serializer;

pub fn listing_status_name<S: Serializer>(id: &StatusId, s: S) -> Result<S::Ok, S::Error> {
    match ListingStatus::from_id(*id) {
        Some(status) => s.serialize_str(status.as_str()),
        None => s.serialize_i16(*id),
    }
}

pub fn offer_status_name<S: Serializer>(id: &StatusId, s: S) -> Result<S::Ok, S::Error> {
    match OfferStatus::from_id(*id) {
        Some(status) => s.serialize_str(status.as_str()),
        None => s.serialize_i16(*id),
    }
}
