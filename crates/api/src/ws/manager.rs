use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use heirloom_core::types::{DbId, Timestamp};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// User bound by a valid `?token=` on upgrade, if any.
    pub user_id: Option<DbId>,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// Room the connection currently belongs to (at most one).
    pub room: Option<String>,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

#[derive(Default)]
struct Registry {
    connections: HashMap<String, WsConnection>,
    rooms: HashMap<String, HashSet<String>>,
}

impl Registry {
    fn leave_current_room(&mut self, conn_id: &str) -> Option<String> {
        let room = self.connections.get_mut(conn_id)?.room.take()?;
        if let Some(members) = self.rooms.get_mut(&room) {
            members.remove(conn_id);
            if members.is_empty() {
                self.rooms.remove(&room);
            }
        }
        Some(room)
    }
}

/// Manages all active WebSocket connections and their room membership.
///
/// Connections and rooms live behind one `RwLock` so membership never
/// points at a removed connection. Wrap in `Arc` and share via `AppState`.
pub struct WsManager {
    registry: RwLock<Registry>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::default()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(
        &self,
        conn_id: String,
        user_id: Option<DbId>,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            user_id,
            sender: tx,
            room: None,
            connected_at: chrono::Utc::now(),
        };
        self.registry.write().await.connections.insert(conn_id, conn);
        rx
    }

    /// Remove a connection and its room membership.
    ///
    /// Returns the room it was in, if any.
    pub async fn remove(&self, conn_id: &str) -> Option<String> {
        let mut registry = self.registry.write().await;
        let room = registry.leave_current_room(conn_id);
        registry.connections.remove(conn_id);
        room
    }

    /// Move a connection into `room`, leaving its previous room.
    ///
    /// Returns `false` if the connection is unknown.
    pub async fn join_room(&self, conn_id: &str, room: &str) -> bool {
        let mut registry = self.registry.write().await;
        if !registry.connections.contains_key(conn_id) {
            return false;
        }
        registry.leave_current_room(conn_id);
        registry
            .rooms
            .entry(room.to_string())
            .or_default()
            .insert(conn_id.to_string());
        if let Some(conn) = registry.connections.get_mut(conn_id) {
            conn.room = Some(room.to_string());
        }
        true
    }

    /// The room a connection currently belongs to.
    pub async fn room_of(&self, conn_id: &str) -> Option<String> {
        self.registry
            .read()
            .await
            .connections
            .get(conn_id)
            .and_then(|c| c.room.clone())
    }

    /// The user bound to a connection at upgrade, if any.
    pub async fn user_of(&self, conn_id: &str) -> Option<DbId> {
        self.registry
            .read()
            .await
            .connections
            .get(conn_id)
            .and_then(|c| c.user_id)
    }

    /// Number of connections in `room`.
    pub async fn room_size(&self, room: &str) -> usize {
        self.registry
            .read()
            .await
            .rooms
            .get(room)
            .map_or(0, HashSet::len)
    }

    /// Number of rooms with at least one member.
    pub async fn room_count(&self) -> usize {
        self.registry.read().await.rooms.len()
    }

    /// Send a message to one connection. Returns `false` if it is gone.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        match self.registry.read().await.connections.get(conn_id) {
            Some(conn) => conn.sender.send(message).is_ok(),
            None => false,
        }
    }

    /// Send a message to every connection in `room`, optionally skipping one.
    ///
    /// Closed channels are skipped; they are cleaned up when their receive
    /// loop ends. Returns the number of connections sent to.
    pub async fn broadcast_to_room(
        &self,
        room: &str,
        except: Option<&str>,
        message: Message,
    ) -> usize {
        let registry = self.registry.read().await;
        let Some(members) = registry.rooms.get(room) else {
            return 0;
        };

        let mut count = 0;
        for conn_id in members {
            if Some(conn_id.as_str()) == except {
                continue;
            }
            if let Some(conn) = registry.connections.get(conn_id) {
                if conn.sender.send(message.clone()).is_ok() {
                    count += 1;
                }
            }
        }
        count
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.registry.read().await.connections.len()
    }

    /// Send a Close frame to every connection, then clear the registry.
    pub async fn shutdown_all(&self) {
        let mut registry = self.registry.write().await;
        let count = registry.connections.len();
        for conn in registry.connections.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        registry.connections.clear();
        registry.rooms.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client. Returns how many
    /// writers accepted it.
    pub async fn ping_all(&self) -> usize {
        let registry = self.registry.read().await;
        registry
            .connections
            .values()
            .filter(|conn| conn.sender.send(Message::Ping(Bytes::new())).is_ok())
            .count()
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
