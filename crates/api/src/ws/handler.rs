use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use heirloom_core::chat::ServerEvent;
use heirloom_core::types::DbId;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::hub::ChatHub;
use crate::ws::manager::WsManager;

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Optional access token binding the connection to a user.
    pub token: Option<String>,
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// A `?token=` that fails validation is rejected with 401 before upgrading.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
) -> AppResult<Response> {
    let user_id = match params.token.as_deref() {
        Some(token) => Some(AuthUser::from_token(token, &state.config.jwt)?.user_id),
        None => None,
    };

    let manager = Arc::clone(&state.ws_manager);
    let hub = Arc::clone(&state.chat_hub);
    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, manager, hub, user_id))
        .into_response())
}

/// Manage a single WebSocket connection after upgrade.
///
/// Registers the connection, spawns a sender task fed by the manager
/// channel, dispatches inbound frames to the hub, and cleans up on
/// disconnect.
async fn handle_socket(
    socket: WebSocket,
    ws_manager: Arc<WsManager>,
    hub: Arc<ChatHub>,
    user_id: Option<DbId>,
) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, user_id = ?user_id, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), user_id).await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => hub.handle_text(&conn_id, text.as_str()).await,
            Ok(Message::Binary(_)) => {
                let reply = ServerEvent::error("Binary frames are not supported").to_json();
                ws_manager
                    .send_to(&conn_id, Message::Text(reply.into()))
                    .await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Ping(_)) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    hub.disconnect(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}
