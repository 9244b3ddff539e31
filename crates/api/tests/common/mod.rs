#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use heirloom_api::auth::jwt::{generate_access_token, JwtConfig};
use heirloom_api::auth::password::{hash_password, Argon2Credentials};
use heirloom_api::config::ServerConfig;
use heirloom_api::router::build_app_router;
use heirloom_api::state::AppState;
use heirloom_api::ws::{ChatHub, PgMessageStore, WsManager};
use heirloom_db::models::listing::CreateListing;
use heirloom_db::models::user::{CreateUser, User};
use heirloom_db::repositories::{ListingRepo, UserRepo};

/// Password used for every user created by [`create_user`].
pub const TEST_PASSWORD: &str = "heirloom-test-pw";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router over `pool`, with the same middleware
/// stack production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let ws_manager = Arc::new(WsManager::new());
    let chat_hub = Arc::new(ChatHub::new(
        Arc::clone(&ws_manager),
        Arc::new(PgMessageStore::new(pool.clone())),
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager,
        chat_hub,
        credentials: Arc::new(Argon2Credentials),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user directly and mint an access token for them.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user insert should succeed")
    .expect("role should exist");

    let token = generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Insert an available listing owned by `seller_id`.
pub async fn create_listing(pool: &PgPool, seller_id: i64, title: &str, price: i64) -> i64 {
    ListingRepo::create(
        pool,
        &CreateListing {
            seller_id,
            category_id: None,
            title: title.to_string(),
            description: "Estate find".to_string(),
            price,
            condition: "Good".to_string(),
            year: Some(1900),
            images: vec!["/uploads/item.jpg".to_string()],
        },
    )
    .await
    .expect("listing insert should succeed")
    .id
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request("GET", uri, None, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request("GET", uri, Some(token), None)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, request("POST", uri, None, Some(body))).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request("POST", uri, Some(token), Some(body))).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request("PUT", uri, Some(token), None)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, request("PUT", uri, Some(token), Some(body))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, request("DELETE", uri, Some(token), None)).await
}
