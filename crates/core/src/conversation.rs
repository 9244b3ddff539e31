//! Chat counterpart resolution.
//!
//! Decides who the viewer of a listing's chat room is talking to, using only
//! the listing's seller and its offers. Callers recompute this on every room
//! entry because offer state changes over a listing's life.

use serde::Serialize;

use crate::status::OfferStatus;
use crate::types::{DbId, Timestamp};

/// The slice of an offer the resolver looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferSnapshot {
    pub id: DbId,
    pub buyer_id: DbId,
    pub status: OfferStatus,
    pub created_at: Timestamp,
}

/// Which rule produced the counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Viewer is a buyer; the seller is always reachable.
    ListingSeller,
    /// Seller picked a buyer who has an offer on the listing.
    ExplicitSelection,
    /// The buyer whose offer was accepted.
    AcceptedOffer,
    /// The buyer with the most recently created pending offer.
    LatestPendingOffer,
}

/// The other participant in a listing's chat relative to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Counterpart {
    pub user_id: DbId,
    pub resolution: Resolution,
}

/// Resolve the chat counterpart for `viewer_id` on a listing owned by
/// `seller_id`.
///
/// Returns `None` when the viewer is the seller and no buyer can be paired:
/// the explicit selection has no offer on the listing, or there are no
/// accepted or pending offers at all.
pub fn resolve_counterpart(
    seller_id: DbId,
    viewer_id: DbId,
    explicit_counterpart: Option<DbId>,
    offers: &[OfferSnapshot],
) -> Option<Counterpart> {
    if viewer_id != seller_id {
        return Some(Counterpart {
            user_id: seller_id,
            resolution: Resolution::ListingSeller,
        });
    }

    if let Some(buyer_id) = explicit_counterpart {
        return offers
            .iter()
            .any(|o| o.buyer_id == buyer_id)
            .then_some(Counterpart {
                user_id: buyer_id,
                resolution: Resolution::ExplicitSelection,
            });
    }

    if let Some(accepted) = offers.iter().find(|o| o.status == OfferStatus::Accepted) {
        return Some(Counterpart {
            user_id: accepted.buyer_id,
            resolution: Resolution::AcceptedOffer,
        });
    }

    offers
        .iter()
        .filter(|o| o.status == OfferStatus::Pending)
        .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        .map(|o| Counterpart {
            user_id: o.buyer_id,
            resolution: Resolution::LatestPendingOffer,
        })
}
