//! HTTP-level integration tests for listings, categories, and the chat
//! counterpart lookup.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_listing, create_user, delete_auth, get, get_auth,
    post_json_auth, put_auth, put_json_auth,
};
use heirloom_db::models::message::CreateMessage;
use heirloom_db::repositories::{ListingRepo, MessageRepo};
use serde_json::json;
use sqlx::PgPool;

fn new_listing_body(title: &str, category: &str) -> serde_json::Value {
    json!({
        "title": title,
        "description": "Walnut, hand-carved",
        "price": 1_250_00,
        "condition": "Excellent",
        "year": 1885,
        "category": category,
        "images": ["/uploads/a.jpg", "/uploads/b.jpg"],
    })
}

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_categories_are_seeded(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/categories").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Furniture"));
    assert!(names.contains(&"Clocks"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_filter_by_category(pool: PgPool) {
    let (_, seller) = create_user(&pool, "seller@x.test", "Seller").await;

    for (title, category) in [("Chaise", "Furniture"), ("Carriage Clock", "Clocks")] {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            "/api/v1/listings",
            new_listing_body(title, category),
            &seller,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "available");
        assert_eq!(json["data"]["images"].as_array().unwrap().len(), 2);
    }

    let response = get(build_test_app(pool.clone()), "/api/v1/listings?category=Clocks").await;
    let json = body_json(response).await;
    let listings = json["data"].as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["title"], "Carriage Clock");
    assert_eq!(listings[0]["category_name"], "Clocks");
    assert_eq!(listings[0]["seller_email"], "seller@x.test");

    let response = get(build_test_app(pool), "/api/v1/listings?category=all").await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sold_listings_leave_public_browse(pool: PgPool) {
    let (seller, seller_token) = create_user(&pool, "seller@x.test", "Seller").await;
    let listing_id = create_listing(&pool, seller.id, "Tea Set", 300_00).await;
    ListingRepo::mark_sold(&pool, listing_id).await.unwrap();

    let response = get(build_test_app(pool.clone()), "/api/v1/listings").await;
    assert!(body_json(response).await["data"].as_array().unwrap().is_empty());

    // Still visible by id and to the owner.
    let response = get(build_test_app(pool.clone()), &format!("/api/v1/listings/{listing_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "sold");

    let response = get_auth(build_test_app(pool), "/api/v1/listings/mine", &seller_token).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_listing_is_not_found(pool: PgPool) {
    let response = get(build_test_app(pool), "/api/v1/listings/777777").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_listing_validation(pool: PgPool) {
    let (_, seller) = create_user(&pool, "seller@x.test", "Seller").await;
    let (_, buyer) = create_user(&pool, "buyer@x.test", "Buyer").await;

    let mut no_images = new_listing_body("Chaise", "Furniture");
    no_images["images"] = json!([]);
    let mut too_many = new_listing_body("Chaise", "Furniture");
    too_many["images"] = json!(["1", "2", "3", "4", "5", "6"]);
    let mut blank_title = new_listing_body("   ", "Furniture");
    blank_title["price"] = json!(100);
    let mut free = new_listing_body("Chaise", "Furniture");
    free["price"] = json!(0);

    for body in [no_images, too_many, blank_title, free] {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            "/api/v1/listings",
            body.clone(),
            &seller,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }

    let response = post_json_auth(
        build_test_app(pool),
        "/api/v1/listings",
        new_listing_body("Chaise", "Furniture"),
        &buyer,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete_require_ownership(pool: PgPool) {
    let (seller, seller_token) = create_user(&pool, "seller@x.test", "Seller").await;
    let (_, intruder) = create_user(&pool, "intruder@x.test", "Seller").await;
    let listing_id = create_listing(&pool, seller.id, "Tea Set", 300_00).await;
    let uri = format!("/api/v1/listings/{listing_id}");

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "price": 1 }),
        &intruder,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(build_test_app(pool.clone()), &uri, &intruder).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        build_test_app(pool.clone()),
        &uri,
        json!({ "price": 350_00, "title": "Spode Tea Set", "category": "Ceramics" }),
        &seller_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["price"], 350_00);
    assert_eq!(json["data"]["title"], "Spode Tea Set");
    assert_eq!(json["data"]["status"], "available");

    let response = delete_auth(build_test_app(pool.clone()), &uri, &seller_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(build_test_app(pool), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Chat counterpart and conversations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_counterpart_follows_offer_state(pool: PgPool) {
    let (seller, seller_token) = create_user(&pool, "seller@x.test", "Seller").await;
    let (b1, b1_token) = create_user(&pool, "b1@x.test", "Buyer").await;
    let (b2, b2_token) = create_user(&pool, "b2@x.test", "Buyer").await;
    let listing_id = create_listing(&pool, seller.id, "Brass Sextant", 800_00).await;
    let uri = format!("/api/v1/listings/{listing_id}/counterpart");

    // Buyers always talk to the seller.
    let response = get_auth(build_test_app(pool.clone()), &uri, &b1_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["counterpart"]["id"], seller.id);
    assert_eq!(json["data"]["resolution"], "listing_seller");

    // No offers yet: the seller has nobody to talk to.
    let response = get_auth(build_test_app(pool.clone()), &uri, &seller_token).await;
    let json = body_json(response).await;
    assert!(json["data"]["counterpart"].is_null());

    let mut offer_ids = Vec::new();
    for token in [&b1_token, &b2_token] {
        let response = post_json_auth(
            build_test_app(pool.clone()),
            "/api/v1/offers",
            json!({ "listingId": listing_id, "quotedPrice": 500_00 }),
            token,
        )
        .await;
        offer_ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }

    // Latest pending offer wins while nothing is accepted.
    let response = get_auth(build_test_app(pool.clone()), &uri, &seller_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["counterpart"]["id"], b2.id);
    assert_eq!(json["data"]["resolution"], "latest_pending_offer");

    // Explicit pick of a buyer with an offer.
    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("{uri}?buyer_id={}", b1.id),
        &seller_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["counterpart"]["id"], b1.id);
    assert_eq!(json["data"]["resolution"], "explicit_selection");

    // Explicit pick of a stranger yields nobody.
    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("{uri}?buyer_id={}", seller.id + 1000),
        &seller_token,
    )
    .await;
    assert!(body_json(response).await["data"]["counterpart"].is_null());

    // After acceptance the accepted buyer wins.
    let response = put_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/offers/{}/accept", offer_ids[0]),
        &seller_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(build_test_app(pool), &uri, &seller_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["counterpart"]["id"], b1.id);
    assert_eq!(json["data"]["resolution"], "accepted_offer");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seller_conversations_list(pool: PgPool) {
    let (seller, seller_token) = create_user(&pool, "seller@x.test", "Seller").await;
    let (_, other_seller) = create_user(&pool, "other@x.test", "Seller").await;
    let (buyer, _) = create_user(&pool, "buyer@x.test", "Buyer").await;
    let listing_id = create_listing(&pool, seller.id, "Brass Sextant", 800_00).await;

    for (sender, receiver, text) in [
        (buyer.id, seller.id, "Is it still available?"),
        (seller.id, buyer.id, "Yes it is"),
    ] {
        MessageRepo::create(
            &pool,
            &CreateMessage {
                listing_id,
                sender_id: sender,
                receiver_id: receiver,
                message: text.to_string(),
            },
        )
        .await
        .unwrap();
    }

    let uri = format!("/api/v1/listings/{listing_id}/conversations");
    let response = get_auth(build_test_app(pool.clone()), &uri, &seller_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let threads = json["data"].as_array().unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["buyer_id"], buyer.id);
    assert_eq!(threads[0]["message_count"], 2);

    let response = get_auth(build_test_app(pool), &uri, &other_seller).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
