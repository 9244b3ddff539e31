//! Chat counterpart lookup and the seller's conversation list.

use heirloom_core::chat::ChatParticipant;
use heirloom_core::conversation::{resolve_counterpart, Resolution};
use heirloom_core::error::CoreError;
use heirloom_core::types::DbId;
use heirloom_db::models::listing::Listing;
use heirloom_db::models::message::ConversationSummary;
use heirloom_db::repositories::{ListingRepo, MessageRepo, OfferRepo, UserRepo};
use heirloom_db::DbPool;
use serde::Serialize;

use crate::error::AppResult;

/// Who the viewer talks to in a listing's chat room.
///
/// `counterpart` is `None` when the viewer is the seller and no buyer can be
/// paired yet; clients should disable sending in that case.
#[derive(Debug, Clone, Serialize)]
pub struct CounterpartView {
    pub listing_id: DbId,
    pub seller_id: DbId,
    pub counterpart: Option<ChatParticipant>,
    pub resolution: Option<Resolution>,
}

/// Resolve the chat counterpart for `viewer_id` on a listing.
///
/// Recomputed from current offer state on every call.
pub async fn counterpart_for_viewer(
    pool: &DbPool,
    listing_id: DbId,
    viewer_id: DbId,
    explicit_counterpart: Option<DbId>,
) -> AppResult<CounterpartView> {
    let listing = find_listing(pool, listing_id).await?;

    let offers = OfferRepo::list_by_listing(pool, listing_id).await?;
    let snapshots: Vec<_> = offers.iter().filter_map(|o| o.snapshot()).collect();

    let resolved = resolve_counterpart(
        listing.seller_id,
        viewer_id,
        explicit_counterpart,
        &snapshots,
    );

    let counterpart = match resolved {
        Some(c) => UserRepo::find_by_id(pool, c.user_id)
            .await?
            .map(|user| user.participant()),
        None => None,
    };

    tracing::debug!(
        listing_id,
        viewer_id,
        counterpart_id = counterpart.as_ref().map(|c| c.id),
        "Resolved chat counterpart"
    );

    Ok(CounterpartView {
        listing_id,
        seller_id: listing.seller_id,
        resolution: counterpart.as_ref().and(resolved.map(|c| c.resolution)),
        counterpart,
    })
}

/// Every buyer the seller has messaged with on their listing.
pub async fn conversations_for_seller(
    pool: &DbPool,
    listing_id: DbId,
    seller_id: DbId,
) -> AppResult<Vec<ConversationSummary>> {
    let listing = find_listing(pool, listing_id).await?;
    if listing.seller_id != seller_id {
        return Err(CoreError::Forbidden(
            "Not authorized to view conversations for this listing".into(),
        )
        .into());
    }

    Ok(MessageRepo::conversations_for_seller(pool, listing_id, seller_id).await?)
}

async fn find_listing(pool: &DbPool, listing_id: DbId) -> AppResult<Listing> {
    Ok(ListingRepo::find_by_id(pool, listing_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        })?)
}
