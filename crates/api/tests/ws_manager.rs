//! Tests for `WsManager` room membership and delivery.
//!
//! These drive the registry directly through the receivers returned by
//! `add()`, without any HTTP upgrade.

use assert_matches::assert_matches;
use axum::extract::ws::Message;
use heirloom_api::ws::{ping_round, WsManager};

fn text(body: &str) -> Message {
    Message::Text(body.to_string().into())
}

// ---------------------------------------------------------------------------
// Test: add/remove track the connection count
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_and_remove_track_connection_count() {
    let manager = WsManager::new();
    assert_eq!(manager.connection_count().await, 0);

    let _rx1 = manager.add("conn-1".to_string(), None).await;
    let _rx2 = manager.add("conn-2".to_string(), Some(7)).await;
    assert_eq!(manager.connection_count().await, 2);
    assert_eq!(manager.user_of("conn-2").await, Some(7));
    assert_eq!(manager.user_of("conn-1").await, None);

    manager.remove("conn-1").await;
    manager.remove("nonexistent").await;
    assert_eq!(manager.connection_count().await, 1);
}

// ---------------------------------------------------------------------------
// Test: a connection belongs to at most one room
// ---------------------------------------------------------------------------

#[tokio::test]
async fn joining_a_room_leaves_the_previous_one() {
    let manager = WsManager::new();
    let _rx = manager.add("conn-1".to_string(), None).await;

    assert!(manager.join_room("conn-1", "listing-5").await);
    assert_eq!(manager.room_size("listing-5").await, 1);

    assert!(manager.join_room("conn-1", "listing-7").await);
    assert_eq!(manager.room_of("conn-1").await.as_deref(), Some("listing-7"));
    assert_eq!(manager.room_size("listing-5").await, 0);
    assert_eq!(manager.room_size("listing-7").await, 1);
    assert_eq!(manager.room_count().await, 1);
}

#[tokio::test]
async fn unknown_connection_cannot_join() {
    let manager = WsManager::new();

    assert!(!manager.join_room("ghost", "listing-5").await);
    assert_eq!(manager.room_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: broadcast reaches room members only, honoring `except`
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_reaches_room_members_except_skipped() {
    let manager = WsManager::new();
    let mut rx_a = manager.add("a".to_string(), None).await;
    let mut rx_b = manager.add("b".to_string(), None).await;
    let mut rx_other = manager.add("other".to_string(), None).await;

    manager.join_room("a", "listing-5").await;
    manager.join_room("b", "listing-5").await;
    manager.join_room("other", "listing-7").await;

    let sent = manager
        .broadcast_to_room("listing-5", Some("a"), text("typing"))
        .await;
    assert_eq!(sent, 1);

    assert!(rx_a.try_recv().is_err(), "skipped connection got a frame");
    assert_eq!(rx_b.try_recv().unwrap(), text("typing"));
    assert!(rx_other.try_recv().is_err(), "other room got a frame");

    let sent = manager.broadcast_to_room("listing-5", None, text("hello")).await;
    assert_eq!(sent, 2);
    assert_eq!(rx_a.try_recv().unwrap(), text("hello"));
    assert_eq!(rx_b.try_recv().unwrap(), text("hello"));
}

#[tokio::test]
async fn broadcast_to_empty_room_sends_nothing() {
    let manager = WsManager::new();
    let _rx = manager.add("a".to_string(), None).await;

    assert_eq!(manager.broadcast_to_room("listing-9", None, text("x")).await, 0);
}

// ---------------------------------------------------------------------------
// Test: remove() cleans up room membership
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remove_returns_room_and_prunes_empty_rooms() {
    let manager = WsManager::new();
    let _rx1 = manager.add("conn-1".to_string(), None).await;
    let _rx2 = manager.add("conn-2".to_string(), None).await;
    manager.join_room("conn-1", "listing-5").await;
    manager.join_room("conn-2", "listing-5").await;

    assert_eq!(manager.remove("conn-1").await.as_deref(), Some("listing-5"));
    assert_eq!(manager.room_size("listing-5").await, 1);

    manager.remove("conn-2").await;
    assert_eq!(manager.room_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: send_to() reports delivery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_to_reports_missing_connection() {
    let manager = WsManager::new();
    let mut rx = manager.add("conn-1".to_string(), None).await;

    assert!(manager.send_to("conn-1", text("direct")).await);
    assert_eq!(rx.try_recv().unwrap(), text("direct"));
    assert!(!manager.send_to("gone", text("direct")).await);
}

// ---------------------------------------------------------------------------
// Test: shutdown_all() sends Close and clears everything
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("conn-1".to_string(), None).await;
    let mut rx2 = manager.add("conn-2".to_string(), None).await;
    manager.join_room("conn-1", "listing-5").await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert_eq!(manager.room_count().await, 0);
    assert_matches!(rx1.recv().await, Some(Message::Close(None)));
    assert_matches!(rx2.recv().await, Some(Message::Close(None)));
}

// ---------------------------------------------------------------------------
// Test: a keep-alive round pings every live connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ping_round_pings_live_connections() {
    let manager = WsManager::new();
    assert_eq!(ping_round(&manager).await, 0);

    let mut rx = manager.add("conn-1".to_string(), None).await;
    let closed = manager.add("conn-2".to_string(), None).await;
    drop(closed);

    assert_eq!(ping_round(&manager).await, 1);
    assert_matches!(rx.recv().await, Some(Message::Ping(_)));
}
