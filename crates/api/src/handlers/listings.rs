//! Handlers for the `/listings` resource.
//!
//! Browsing is public; writes require the `Seller` role and ownership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use heirloom_core::error::CoreError;
use heirloom_core::listing::{validate_images, validate_price, validate_required, validate_title};
use heirloom_core::types::{DbId, MinorUnits};
use heirloom_db::models::listing::{CreateListing, Listing, ListingDetail, UpdateListing};
use heirloom_db::models::message::ConversationSummary;
use heirloom_db::repositories::{CategoryRepo, ListingRepo};
use heirloom_db::DbPool;
use serde::Deserialize;

use crate::engine::conversations::{
    conversations_for_seller, counterpart_for_viewer, CounterpartView,
};
use crate::error::AppResult;
use crate::middleware::rbac::{RequireAuth, RequireSeller};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /listings`.
#[derive(Debug, Deserialize)]
pub struct ListingFilter {
    /// Category name; `"all"` or absent means no filter.
    pub category: Option<String>,
}

/// Request body for `POST /listings`.
#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    pub title: String,
    pub description: String,
    pub price: MinorUnits,
    pub condition: String,
    pub year: Option<i32>,
    /// Category name; unknown names leave the listing uncategorized.
    pub category: Option<String>,
    /// Image paths already stored by the upload service.
    pub images: Vec<String>,
}

/// Request body for `PUT /listings/{id}`. Status is not editable.
#[derive(Debug, Deserialize)]
pub struct UpdateListingRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<MinorUnits>,
    pub condition: Option<String>,
    pub year: Option<i32>,
    pub category: Option<String>,
    pub images: Option<Vec<String>>,
}

/// Query parameters for `GET /listings/{id}/counterpart`.
#[derive(Debug, Deserialize)]
pub struct CounterpartQuery {
    /// Seller-side explicit pick of which buyer to talk to.
    pub buyer_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/listings
///
/// Available listings, newest first.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ListingFilter>,
) -> AppResult<Json<DataResponse<Vec<ListingDetail>>>> {
    let category = filter
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("all"));
    let listings = ListingRepo::list_available(&state.pool, category).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// GET /api/v1/listings/mine
///
/// Every listing owned by the seller, sold ones included.
pub async fn list_mine(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
) -> AppResult<Json<DataResponse<Vec<ListingDetail>>>> {
    let listings = ListingRepo::list_by_seller(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// GET /api/v1/listings/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ListingDetail>>> {
    let listing = ListingRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id,
        })?;
    Ok(Json(DataResponse { data: listing }))
}

/// POST /api/v1/listings
pub async fn create(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Json(input): Json<CreateListingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Listing>>)> {
    validate_title(&input.title).map_err(CoreError::Validation)?;
    validate_required("Description", &input.description).map_err(CoreError::Validation)?;
    validate_required("Condition", &input.condition).map_err(CoreError::Validation)?;
    validate_price(input.price).map_err(CoreError::Validation)?;
    validate_images(&input.images).map_err(CoreError::Validation)?;

    let category_id = resolve_category(&state.pool, input.category.as_deref()).await?;

    let listing = ListingRepo::create(
        &state.pool,
        &CreateListing {
            seller_id: user.user_id,
            category_id,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            price: input.price,
            condition: input.condition.trim().to_string(),
            year: input.year,
            images: input.images,
        },
    )
    .await?;

    tracing::info!(listing_id = listing.id, seller_id = user.user_id, "Listing created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

/// PUT /api/v1/listings/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateListingRequest>,
) -> AppResult<Json<DataResponse<Listing>>> {
    if let Some(title) = &input.title {
        validate_title(title).map_err(CoreError::Validation)?;
    }
    if let Some(description) = &input.description {
        validate_required("Description", description).map_err(CoreError::Validation)?;
    }
    if let Some(condition) = &input.condition {
        validate_required("Condition", condition).map_err(CoreError::Validation)?;
    }
    if let Some(price) = input.price {
        validate_price(price).map_err(CoreError::Validation)?;
    }
    if let Some(images) = &input.images {
        validate_images(images).map_err(CoreError::Validation)?;
    }

    ensure_owner(&state.pool, id, user.user_id).await?;
    let category_id = resolve_category(&state.pool, input.category.as_deref()).await?;

    let changes = UpdateListing {
        category_id,
        title: input.title.map(|t| t.trim().to_string()),
        description: input.description.map(|d| d.trim().to_string()),
        price: input.price,
        condition: input.condition.map(|c| c.trim().to_string()),
        year: input.year,
        images: input.images,
    };

    let listing = ListingRepo::update(&state.pool, id, user.user_id, &changes)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id,
        })?;

    tracing::info!(listing_id = id, seller_id = user.user_id, "Listing updated");
    Ok(Json(DataResponse { data: listing }))
}

/// DELETE /api/v1/listings/{id}
///
/// Offers and messages on the listing are removed with it.
pub async fn delete(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_owner(&state.pool, id, user.user_id).await?;
    if !ListingRepo::delete(&state.pool, id, user.user_id).await? {
        return Err(CoreError::NotFound {
            entity: "Listing",
            id,
        }
        .into());
    }
    tracing::info!(listing_id = id, seller_id = user.user_id, "Listing deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/listings/{id}/counterpart
///
/// Who the caller talks to in this listing's chat room.
pub async fn counterpart(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Query(query): Query<CounterpartQuery>,
) -> AppResult<Json<DataResponse<CounterpartView>>> {
    let view = counterpart_for_viewer(&state.pool, id, user.user_id, query.buyer_id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/listings/{id}/conversations
///
/// Buyers the seller has exchanged messages with on this listing.
pub async fn conversations(
    State(state): State<AppState>,
    RequireSeller(user): RequireSeller,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ConversationSummary>>>> {
    let threads = conversations_for_seller(&state.pool, id, user.user_id).await?;
    Ok(Json(DataResponse { data: threads }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// 404 if the listing does not exist, 403 if it belongs to someone else.
async fn ensure_owner(pool: &DbPool, id: DbId, seller_id: DbId) -> AppResult<()> {
    let listing = ListingRepo::find_by_id(pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id,
        })?;
    if listing.seller_id != seller_id {
        return Err(CoreError::Forbidden("Not authorized to modify this listing".into()).into());
    }
    Ok(())
}

async fn resolve_category(pool: &DbPool, name: Option<&str>) -> AppResult<Option<DbId>> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    let category = CategoryRepo::find_by_name(pool, name).await?;
    if category.is_none() {
        tracing::debug!(category = name, "Unknown category name, leaving listing uncategorized");
    }
    Ok(category.map(|c| c.id))
}
