//! Offer lifecycle engine.
//!
//! Every mutation runs in a transaction that first locks the listing row
//! (`SELECT ... FOR UPDATE`), so create/accept/reject on one listing are
//! serialized. Any error drops the transaction, which rolls it back.

use heirloom_core::error::CoreError;
use heirloom_core::offer::{
    ensure_listing_open, ensure_listing_owner, ensure_no_pending_offer, rank_offers, transition,
    validate_quoted_price, OfferDecision,
};
use heirloom_core::status::{ListingStatus, OfferStatus};
use heirloom_core::types::{DbId, MinorUnits};
use heirloom_db::models::listing::Listing;
use heirloom_db::models::offer::{CreateOffer, Offer, OfferWithBuyer};
use heirloom_db::repositories::{ListingRepo, OfferRepo};
use heirloom_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// The chat room opened between seller and buyer when an offer is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRoom {
    pub listing_id: DbId,
    pub buyer_id: DbId,
    pub seller_id: DbId,
}

/// Result of a successful accept.
#[derive(Debug, Clone)]
pub struct Accepted {
    pub offer: Offer,
    pub chat_room: ChatRoom,
    /// Sibling offers moved from pending to rejected by the cascade.
    pub rejected_siblings: u64,
}

/// Place a new pending offer on an available listing.
pub async fn create_offer(
    pool: &DbPool,
    listing_id: DbId,
    buyer_id: DbId,
    quoted_price: MinorUnits,
) -> AppResult<Offer> {
    validate_quoted_price(quoted_price).map_err(CoreError::Validation)?;

    let mut tx = pool.begin().await?;

    let listing = ListingRepo::lock_for_update(&mut *tx, listing_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        })?;

    if listing.seller_id == buyer_id {
        return Err(CoreError::Forbidden("Cannot make an offer on your own listing".into()).into());
    }
    ensure_listing_open(listing_status(&listing)?)?;
    ensure_no_pending_offer(OfferRepo::has_pending(&mut *tx, listing_id, buyer_id).await?)?;

    let offer = OfferRepo::create(
        &mut *tx,
        &CreateOffer {
            listing_id,
            buyer_id,
            quoted_price,
        },
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        offer_id = offer.id,
        listing_id,
        buyer_id,
        quoted_price,
        "Offer created"
    );
    Ok(offer)
}

/// Accept a pending offer: the offer becomes accepted, every other pending
/// offer on the listing is rejected, and the listing is marked sold.
pub async fn accept_offer(
    pool: &DbPool,
    offer_id: DbId,
    acting_seller_id: DbId,
) -> AppResult<Accepted> {
    let mut tx = pool.begin().await?;
    let (listing, offer) =
        lock_for_decision(&mut tx, offer_id, acting_seller_id, OfferDecision::Accept).await?;

    ensure_listing_open(listing_status(&listing)?)?;

    let (accepted, rejected_siblings) =
        OfferRepo::accept_and_close_listing(&mut tx, offer.id, listing.id).await?;

    tx.commit().await?;

    let chat_room = ChatRoom {
        listing_id: listing.id,
        buyer_id: accepted.buyer_id,
        seller_id: listing.seller_id,
    };
    tracing::info!(
        offer_id,
        listing_id = listing.id,
        buyer_id = accepted.buyer_id,
        rejected_siblings,
        "Offer accepted, listing sold"
    );

    Ok(Accepted {
        offer: accepted,
        chat_room,
        rejected_siblings,
    })
}

/// Reject a pending offer. Other offers and the listing are untouched.
pub async fn reject_offer(
    pool: &DbPool,
    offer_id: DbId,
    acting_seller_id: DbId,
) -> AppResult<Offer> {
    let mut tx = pool.begin().await?;
    let (listing, offer) =
        lock_for_decision(&mut tx, offer_id, acting_seller_id, OfferDecision::Reject).await?;

    let rejected = OfferRepo::settle(&mut *tx, offer.id, OfferStatus::Rejected)
        .await?
        .ok_or_else(|| already_processed(&offer))?;

    tx.commit().await?;

    tracing::info!(offer_id, listing_id = listing.id, "Offer rejected");
    Ok(rejected)
}

/// A seller's view of the offers on their listing, in display order.
pub async fn ranked_offers_for_listing(
    pool: &DbPool,
    listing_id: DbId,
    acting_seller_id: DbId,
) -> AppResult<Vec<OfferWithBuyer>> {
    let listing = ListingRepo::find_by_id(pool, listing_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        })?;

    if listing.seller_id != acting_seller_id {
        return Err(CoreError::Forbidden(
            "Not authorized to view offers for this listing".into(),
        )
        .into());
    }

    let mut offers = OfferRepo::list_with_buyer(pool, listing_id).await?;
    rank_offers(&mut offers);
    Ok(offers)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the offer, lock its listing, check ownership, and re-read the offer
/// under the lock so the pending check sees committed sibling decisions.
async fn lock_for_decision(
    tx: &mut sqlx::PgConnection,
    offer_id: DbId,
    acting_seller_id: DbId,
    decision: OfferDecision,
) -> AppResult<(Listing, Offer)> {
    let not_found = || CoreError::NotFound {
        entity: "Offer",
        id: offer_id,
    };

    let offer = OfferRepo::find_by_id(&mut *tx, offer_id)
        .await?
        .ok_or_else(not_found)?;

    let listing = ListingRepo::lock_for_update(&mut *tx, offer.listing_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id: offer.listing_id,
        })?;

    ensure_listing_owner(listing.seller_id, acting_seller_id, decision)?;

    let offer = OfferRepo::find_by_id(&mut *tx, offer_id)
        .await?
        .ok_or_else(not_found)?;
    transition(offer_status(&offer)?, decision)?;

    Ok((listing, offer))
}

fn listing_status(listing: &Listing) -> Result<ListingStatus, CoreError> {
    listing.status().ok_or_else(|| {
        CoreError::Internal(format!(
            "Listing {} has unknown status id {}",
            listing.id, listing.status_id
        ))
    })
}

fn offer_status(offer: &Offer) -> Result<OfferStatus, CoreError> {
    offer.status().ok_or_else(|| {
        CoreError::Internal(format!(
            "Offer {} has unknown status id {}",
            offer.id, offer.status_id
        ))
    })
}

fn already_processed(offer: &Offer) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Offer {} has already been processed",
        offer.id
    )))
}
