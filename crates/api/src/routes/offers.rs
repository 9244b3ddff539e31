//! Route definitions for the `/offers` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::offers;
use crate::state::AppState;

/// Routes mounted at `/offers`.
///
/// ```text
/// POST /                          -> create
/// GET  /mine                      -> list_mine
/// GET  /listing/{listing_id}      -> list_for_listing
/// PUT  /{id}/accept               -> accept
/// PUT  /{id}/reject               -> reject
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(offers::create))
        .route("/mine", get(offers::list_mine))
        .route("/listing/{listing_id}", get(offers::list_for_listing))
        .route("/{id}/accept", put(offers::accept))
        .route("/{id}/reject", put(offers::reject))
}
