//! Offer lifecycle rules.
//!
//! Pure transition checks and presentation ranking for offers. The
//! transactional side (row locks, cascades) lives in the API engine; every
//! decision it makes goes through the functions here.

use std::cmp::Ordering;

use crate::error::CoreError;
use crate::status::{ListingStatus, OfferStatus};
use crate::types::{DbId, MinorUnits, Timestamp};

/// A seller's decision on a pending offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferDecision {
    Accept,
    Reject,
}

impl OfferDecision {
    /// The terminal status the offer lands in for this decision.
    pub fn target_status(self) -> OfferStatus {
        match self {
            OfferDecision::Accept => OfferStatus::Accepted,
            OfferDecision::Reject => OfferStatus::Rejected,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            OfferDecision::Accept => "accept",
            OfferDecision::Reject => "reject",
        }
    }
}

/// Validate a quoted price. Must be strictly positive.
pub fn validate_quoted_price(quoted_price: MinorUnits) -> Result<(), String> {
    if quoted_price <= 0 {
        return Err(format!(
            "Quoted price must be a positive amount, got {quoted_price}"
        ));
    }
    Ok(())
}

/// Check that a listing can receive a new offer.
pub fn ensure_listing_open(listing_status: ListingStatus) -> Result<(), CoreError> {
    match listing_status {
        ListingStatus::Available => Ok(()),
        ListingStatus::Sold => Err(CoreError::Conflict(
            "Listing is no longer available".into(),
        )),
    }
}

/// Check that the buyer has no pending offer on the listing already.
pub fn ensure_no_pending_offer(existing_pending: bool) -> Result<(), CoreError> {
    if existing_pending {
        return Err(CoreError::Conflict(
            "You already have a pending offer on this listing".into(),
        ));
    }
    Ok(())
}

/// Check that `acting_user_id` owns the listing the offer belongs to.
pub fn ensure_listing_owner(
    listing_seller_id: DbId,
    acting_user_id: DbId,
    decision: OfferDecision,
) -> Result<(), CoreError> {
    if listing_seller_id != acting_user_id {
        return Err(CoreError::Forbidden(format!(
            "Not authorized to {} this offer",
            decision.verb()
        )));
    }
    Ok(())
}

/// Compute the status an offer moves to, rejecting transitions out of a
/// terminal status.
pub fn transition(current: OfferStatus, decision: OfferDecision) -> Result<OfferStatus, CoreError> {
    if current.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "Offer has already been processed (status: {current})"
        )));
    }
    Ok(decision.target_status())
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Fields needed to rank offers for display.
pub trait RankedOffer {
    fn offer_id(&self) -> DbId;
    fn quoted_price(&self) -> MinorUnits;
    fn created_at(&self) -> Timestamp;
}

/// Display order: highest price first, then earliest offer, then lowest id.
pub fn compare_offers<T: RankedOffer>(a: &T, b: &T) -> Ordering {
    b.quoted_price()
        .cmp(&a.quoted_price())
        .then_with(|| a.created_at().cmp(&b.created_at()))
        .then_with(|| a.offer_id().cmp(&b.offer_id()))
}

/// Sort offers in place into display order.
pub fn rank_offers<T: RankedOffer>(offers: &mut [T]) {
    offers.sort_by(compare_offers);
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    struct Quote {
        id: DbId,
        price: MinorUnits,
        at: Timestamp,
    }

    impl RankedOffer for Quote {
        fn offer_id(&self) -> DbId {
            self.id
        }
        fn quoted_price(&self) -> MinorUnits {
            self.price
        }
        fn created_at(&self) -> Timestamp {
            self.at
        }
    }

    fn t(n: i64) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(n)
    }

    #[test]
    fn test_rank_by_price_desc_then_earliest() {
        // Prices [500, 700, 700, 300] created at [t4, t1, t2, t3].
        let mut offers = vec![
            Quote { id: 1, price: 500, at: t(4) },
            Quote { id: 2, price: 700, at: t(1) },
            Quote { id: 3, price: 700, at: t(2) },
            Quote { id: 4, price: 300, at: t(3) },
        ];
        rank_offers(&mut offers);

        let ids: Vec<DbId> = offers.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_rank_tie_on_price_and_time_uses_id() {
        let mut offers = vec![
            Quote { id: 9, price: 100, at: t(0) },
            Quote { id: 5, price: 100, at: t(0) },
        ];
        rank_offers(&mut offers);
        assert_eq!(offers[0].id, 5);
        assert_eq!(offers[1].id, 9);
    }

    #[test]
    fn test_pending_can_be_accepted_or_rejected() {
        assert_matches!(
            transition(OfferStatus::Pending, OfferDecision::Accept),
            Ok(OfferStatus::Accepted)
        );
        assert_matches!(
            transition(OfferStatus::Pending, OfferDecision::Reject),
            Ok(OfferStatus::Rejected)
        );
    }

    #[test]
    fn test_terminal_statuses_conflict() {
        for status in [OfferStatus::Accepted, OfferStatus::Rejected] {
            for decision in [OfferDecision::Accept, OfferDecision::Reject] {
                assert_matches!(transition(status, decision), Err(CoreError::Conflict(_)));
            }
        }
    }

    #[test]
    fn test_sold_listing_refuses_offers() {
        assert!(ensure_listing_open(ListingStatus::Available).is_ok());
        assert_matches!(
            ensure_listing_open(ListingStatus::Sold),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn test_duplicate_pending_conflicts() {
        assert!(ensure_no_pending_offer(false).is_ok());
        assert_matches!(ensure_no_pending_offer(true), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        assert!(ensure_listing_owner(7, 7, OfferDecision::Accept).is_ok());
        let err = ensure_listing_owner(7, 8, OfferDecision::Reject).unwrap_err();
        assert_matches!(&err, CoreError::Forbidden(msg) if msg.contains("reject"));
    }

    #[test]
    fn test_quoted_price_must_be_positive() {
        assert!(validate_quoted_price(1).is_ok());
        assert!(validate_quoted_price(0).is_err());
        assert!(validate_quoted_price(-50).is_err());
    }
}
