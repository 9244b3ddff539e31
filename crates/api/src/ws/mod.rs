//! Real-time listing chat over WebSocket.
//!
//! - [`manager`] -- connection table and room registry.
//! - [`hub`] -- join / send / typing semantics on top of the registry.
//! - [`store`] -- message persistence seam used by the hub.

mod handler;
mod heartbeat;
pub mod hub;
pub mod manager;
pub mod store;

pub use handler::ws_handler;
pub use heartbeat::{ping_round, start_heartbeat};
pub use hub::ChatHub;
pub use manager::WsManager;
pub use store::{MessageStore, PgMessageStore};
