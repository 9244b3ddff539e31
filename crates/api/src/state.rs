use std::sync::Arc;

use crate::auth::password::CredentialHasher;
use crate::config::ServerConfig;
use crate::ws::{ChatHub, WsManager};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: heirloom_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection and room registry.
    pub ws_manager: Arc<WsManager>,
    /// Listing chat hub (join / send / typing over `ws_manager`).
    pub chat_hub: Arc<ChatHub>,
    /// Password hashing scheme.
    pub credentials: Arc<dyn CredentialHasher>,
}
