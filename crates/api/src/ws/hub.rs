//! Listing chat hub.
//!
//! Turns parsed client events into room membership changes, persisted
//! messages and fan-out over [`WsManager`]. One hub is built at startup and
//! shared through `AppState`.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::ws::Message;
use heirloom_core::chat::{
    room_id, validate_message_text, ClientEvent, ServerEvent, HISTORY_LIMIT,
};
use heirloom_core::types::DbId;
use heirloom_db::models::message::CreateMessage;
use tokio::sync::Mutex;

use super::manager::WsManager;
use super::store::MessageStore;

pub struct ChatHub {
    manager: Arc<WsManager>,
    store: Arc<dyn MessageStore>,
    /// Per-room lock held across persist + fan-out, so every member sees
    /// messages in commit order. Entries exist only while in use.
    room_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ChatHub {
    pub fn new(manager: Arc<WsManager>, store: Arc<dyn MessageStore>) -> Self {
        Self {
            manager,
            store,
            room_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Parse a text frame and dispatch it. Malformed frames are answered
    /// with `message-error` on the same connection.
    pub async fn handle_text(&self, conn_id: &str, text: &str) {
        match serde_json::from_str::<ClientEvent>(text) {
            Ok(event) => self.dispatch(conn_id, event).await,
            Err(e) => {
                tracing::debug!(conn_id, error = %e, "Malformed WebSocket frame");
                self.reply(conn_id, ServerEvent::error(format!("Malformed event: {e}")))
                    .await;
            }
        }
    }

    pub async fn dispatch(&self, conn_id: &str, event: ClientEvent) {
        match event {
            ClientEvent::JoinChat {
                listing_id,
                user_id,
            } => self.join(conn_id, listing_id, user_id).await,
            ClientEvent::SendMessage {
                listing_id,
                sender_id,
                receiver_id,
                message,
            } => {
                self.send_message(conn_id, listing_id, sender_id, receiver_id, &message)
                    .await
            }
            ClientEvent::Typing {
                listing_id,
                user_id,
            } => self.typing(conn_id, listing_id, user_id, true).await,
            ClientEvent::StopTyping {
                listing_id,
                user_id,
            } => self.typing(conn_id, listing_id, user_id, false).await,
        }
    }

    /// Move the connection into the listing's room and deliver its history
    /// to that connection only.
    pub async fn join(&self, conn_id: &str, listing_id: DbId, user_id: DbId) {
        if !self.check_identity(conn_id, user_id).await {
            return;
        }

        let room = room_id(listing_id);
        let lock = self.room_lock(&room).await;
        // Sends wait until history is out, so nothing is missed or doubled.
        let guard = lock.lock().await;
        self.join_locked(conn_id, listing_id, user_id, &room).await;
        drop(guard);
        self.release_room_lock(&room, lock).await;
    }

    async fn join_locked(&self, conn_id: &str, listing_id: DbId, user_id: DbId, room: &str) {
        if !self.manager.join_room(conn_id, room).await {
            return;
        }
        tracing::info!(conn_id, user_id, room, "Joined chat room");

        let history = match self.store.recent(listing_id, HISTORY_LIMIT).await {
            Ok(history) => history,
            Err(e) => {
                tracing::error!(conn_id, listing_id, error = %e, "Failed to load chat history");
                Vec::new()
            }
        };
        self.reply(conn_id, ServerEvent::ChatHistory(history)).await;
    }

    /// Persist a message, then broadcast it to every connection in the room
    /// (the sender included).
    ///
    /// Only token-bound connections may send, and only as their own user.
    pub async fn send_message(
        &self,
        conn_id: &str,
        listing_id: DbId,
        sender_id: DbId,
        receiver_id: DbId,
        text: &str,
    ) {
        if self.manager.user_of(conn_id).await.is_none() {
            self.reply(conn_id, ServerEvent::error("Sign in to send messages"))
                .await;
            return;
        }
        if !self.check_identity(conn_id, sender_id).await {
            return;
        }

        let text = match validate_message_text(text) {
            Ok(text) => text.to_string(),
            Err(msg) => {
                self.reply(conn_id, ServerEvent::error(msg)).await;
                return;
            }
        };

        let input = CreateMessage {
            listing_id,
            sender_id,
            receiver_id,
            message: text,
        };

        let room = room_id(listing_id);
        let lock = self.room_lock(&room).await;
        let guard = lock.lock().await;
        self.persist_and_broadcast(conn_id, &room, input).await;
        drop(guard);
        self.release_room_lock(&room, lock).await;
    }

    async fn persist_and_broadcast(&self, conn_id: &str, room: &str, input: CreateMessage) {
        let (listing_id, sender_id) = (input.listing_id, input.sender_id);
        let saved = match self.store.append(input).await {
            Ok(saved) => saved,
            Err(e) => {
                let (_, _, reason) = e.parts();
                tracing::warn!(conn_id, listing_id, sender_id, error = %e, "Failed to persist message");
                self.reply(
                    conn_id,
                    ServerEvent::error(format!("Failed to send message: {reason}")),
                )
                .await;
                return;
            }
        };

        let message_id = saved.id;
        let frame = frame(&ServerEvent::NewMessage(saved));
        let delivered = self
            .manager
            .broadcast_to_room(room, None, frame.clone())
            .await;

        // A sender that never joined still gets its own copy.
        if self.manager.room_of(conn_id).await.as_deref() != Some(room) {
            self.manager.send_to(conn_id, frame).await;
        }

        tracing::debug!(conn_id, message_id, room, delivered, "Message broadcast");
    }

    /// Relay a typing indicator to everyone else in the room. Not persisted.
    pub async fn typing(&self, conn_id: &str, listing_id: DbId, user_id: DbId, started: bool) {
        if !self.check_identity(conn_id, user_id).await {
            return;
        }

        let event = if started {
            ServerEvent::UserTyping { user_id }
        } else {
            ServerEvent::UserStopTyping { user_id }
        };
        self.manager
            .broadcast_to_room(&room_id(listing_id), Some(conn_id), frame(&event))
            .await;
    }

    /// Drop the connection and its room membership. History is kept.
    pub async fn disconnect(&self, conn_id: &str) {
        let room = self.manager.remove(conn_id).await;
        tracing::info!(conn_id, room = ?room, "Left chat");
    }

    /// Number of room locks currently allocated. Locks only live while a
    /// join or send holds or waits on them.
    pub async fn room_lock_count(&self) -> usize {
        self.room_locks.lock().await.len()
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// A connection bound to a user by token may only act as that user.
    async fn check_identity(&self, conn_id: &str, claimed: DbId) -> bool {
        match self.manager.user_of(conn_id).await {
            Some(bound) if bound != claimed => {
                tracing::warn!(conn_id, bound, claimed, "User id mismatch on WebSocket event");
                self.reply(
                    conn_id,
                    ServerEvent::error("User id does not match the authenticated connection"),
                )
                .await;
                false
            }
            _ => true,
        }
    }

    async fn room_lock(&self, room: &str) -> Arc<Mutex<()>> {
        self.room_locks
            .lock()
            .await
            .entry(room.to_string())
            .or_default()
            .clone()
    }

    /// Drop our handle on a room lock and free the entry once no other
    /// join or send holds or waits on it.
    async fn release_room_lock(&self, room: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.room_locks.lock().await;
        drop(lock);
        if locks.get(room).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(room);
        }
    }

    async fn reply(&self, conn_id: &str, event: ServerEvent) {
        self.manager.send_to(conn_id, frame(&event)).await;
    }
}

fn frame(event: &ServerEvent) -> Message {
    Message::Text(event.to_json().into())
}
