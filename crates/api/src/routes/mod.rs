pub mod auth;
pub mod health;
pub mod listings;
pub mod offers;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  WebSocket (optional ?token=)
///
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/me                             current user (auth)
///
/// /categories                          list (public)
///
/// /listings                            list available (public), create (seller)
/// /listings/mine                       seller's own listings
/// /listings/{id}                       get (public), update, delete (owner)
/// /listings/{id}/counterpart           chat counterpart for caller (auth)
/// /listings/{id}/conversations         seller's buyer threads (owner)
///
/// /offers                              create (buyer)
/// /offers/mine                         buyer's own offers
/// /offers/listing/{listing_id}         ranked offers (owner)
/// /offers/{id}/accept                  accept + cascade (owner)
/// /offers/{id}/reject                  reject (owner)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/auth", auth::router())
        .route("/categories", get(handlers::categories::list))
        .nest("/listings", listings::router())
        .nest("/offers", offers::router())
}
