//! Keep-alive pings for idle chat sockets. A listing chat can sit silent for
//! hours between offers.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::ws::manager::WsManager;

const PING_PERIOD: Duration = Duration::from_secs(30);

/// Ping every open socket once. Returns how many were pinged.
pub async fn ping_round(ws_manager: &WsManager) -> usize {
    let pinged = ws_manager.ping_all().await;
    if pinged > 0 {
        let rooms = ws_manager.room_count().await;
        tracing::debug!(
            pinged,
            rooms,
            "Chat keep-alive"
        );
    }
    pinged
}

/// Run [`ping_round`] every 30 seconds until the handle is aborted.
pub fn start_heartbeat(ws_manager: Arc<WsManager>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let first = tokio::time::Instant::now() + PING_PERIOD;
        let mut ticker = tokio::time::interval_at(first, PING_PERIOD);
        // Missed ticks are dropped, not replayed.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            ping_round(&ws_manager).await;
        }
    })
}
