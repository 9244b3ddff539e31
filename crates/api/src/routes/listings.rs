//! Route definitions for the `/listings` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::listings;
use crate::state::AppState;

/// Routes mounted at `/listings`.
///
/// ```text
/// GET    /                      -> list (?category=)
/// POST   /                      -> create
/// GET    /mine                  -> list_mine
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// GET    /{id}/counterpart      -> counterpart (?buyer_id=)
/// GET    /{id}/conversations    -> conversations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(listings::list).post(listings::create))
        .route("/mine", get(listings::list_mine))
        .route(
            "/{id}",
            get(listings::get_by_id)
                .put(listings::update)
                .delete(listings::delete),
        )
        .route("/{id}/counterpart", get(listings::counterpart))
        .route("/{id}/conversations", get(listings::conversations))
}
