//! Handlers for the `/offers` resource.
//!
//! Buyers place offers; the listing's seller ranks, accepts or rejects them.
//! All lifecycle rules run in [`crate::engine::offers`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use heirloom_core::types::{DbId, MinorUnits};
use heirloom_db::models::offer::{Offer, OfferWithBuyer, OfferWithListing};
use heirloom_db::repositories::OfferRepo;
use serde::{Deserialize, Serialize};

use crate::engine::offers::{self as engine, ChatRoom};
use crate::error::AppResult;
use crate::middleware::rbac::{RequireBuyer, RequireSeller};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /offers`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOfferRequest {
    pub listing_id: DbId,
    pub quoted_price: MinorUnits,
}

/// Response body for `PUT /offers/{id}/accept`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponse {
    pub chat_room: ChatRoom,
    pub offer: Offer,
    pub rejected_count: u64,
}

/// POST /api/v1/offers
pub async fn create(
    State(state): State<AppState>,
    RequireBuyer(user): RequireBuyer,
    Json(input): Json<CreateOfferRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Offer>>)> {
    let offer =
        engine::create_offer(&state.pool, input.listing_id, user.user_id, input.quoted_price)
            .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: offer })))
}

/// GET /api/v1/offers/mine
///
/// The buyer's own offers with listing summaries, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireBuyer(user): RequireBuyer,
) -> AppResult<Json<DataResponse<Vec<OfferWithListing>>>> {
    let offers = OfferRepo::list_by_buyer(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: offers }))
}

/// GET /api/v1/offers/listing/{listing_id}
///
/// Offers on the seller's listing: highest price first, then earliest.
pub async fn list_for_listing(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<OfferWithBuyer>>>> {
    let offers = engine::ranked_offers_for_listing(&state.pool, listing_id, user.user_id).await?;
    Ok(Json(DataResponse { data: offers }))
}

/// PUT /api/v1/offers/{id}/accept
///
/// Accepts the offer, rejects its pending siblings, marks the listing sold,
/// and returns the chat room for the seller and winning buyer.
pub async fn accept(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AcceptResponse>>> {
    let accepted = engine::accept_offer(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse {
        data: AcceptResponse {
            chat_room: accepted.chat_room,
            offer: accepted.offer,
            rejected_count: accepted.rejected_siblings,
        },
    }))
}

/// PUT /api/v1/offers/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Offer>>> {
    let offer = engine::reject_offer(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: offer }))
}
