//! Unit tests for `WsManager`, without any HTTP upgrade.

use axum::extract::ws::Message;
use mailsbe_api::ws::WsManager;
use uuid::Uuid;

#[tokio::test]
async fn new_manager_has_zero_connections() {
    let manager = WsManager::new();
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn add_and_remove_track_count() {
    let manager = WsManager::new();
    let user = Uuid::new_v4();

    let _rx = manager.add("conn-1".to_string(), user).await;
    assert_eq!(manager.connection_count().await, 1);

    let removed = manager.remove("conn-1").await.expect("connection was registered");
    assert_eq!(removed.user_id, user);
    assert_eq!(manager.connection_count().await, 0);
}

#[tokio::test]
async fn remove_unknown_id_is_noop() {
    let manager = WsManager::new();
    let _rx = manager.add("conn-1".to_string(), Uuid::new_v4()).await;

    assert!(manager.remove("nonexistent").await.is_none());
    assert_eq!(manager.connection_count().await, 1);
}

#[tokio::test]
async fn send_to_user_reaches_every_socket_of_that_user_only() {
    let manager = WsManager::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    let mut tab1 = manager.add("a1".to_string(), alice).await;
    let mut tab2 = manager.add("a2".to_string(), alice).await;
    let mut other = manager.add("b1".to_string(), bob).await;

    let sent = manager
        .send_to_user(alice, Message::Text("hello".into()))
        .await;
    assert_eq!(sent, 2);

    assert!(matches!(tab1.try_recv(), Ok(Message::Text(t)) if t.as_str() == "hello"));
    assert!(matches!(tab2.try_recv(), Ok(Message::Text(t)) if t.as_str() == "hello"));
    assert!(other.try_recv().is_err());
}

#[tokio::test]
async fn send_to_user_skips_dropped_receivers() {
    let manager = WsManager::new();
    let user = Uuid::new_v4();

    let rx = manager.add("gone".to_string(), user).await;
    drop(rx);

    assert_eq!(manager.send_to_user(user, Message::Text("x".into())).await, 0);
}

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let manager = WsManager::new();

    let mut rx1 = manager.add("conn-1".to_string(), Uuid::new_v4()).await;
    let mut rx2 = manager.add("conn-2".to_string(), Uuid::new_v4()).await;

    manager.shutdown_all().await;

    assert_eq!(manager.connection_count().await, 0);
    assert!(matches!(rx1.recv().await, Some(Message::Close(None))));
    assert!(matches!(rx2.recv().await, Some(Message::Close(None))));
}

#[tokio::test]
async fn ping_all_sends_ping_frames() {
    let manager = WsManager::new();
    let mut rx = manager.add("conn-1".to_string(), Uuid::new_v4()).await;

    manager.ping_all().await;

    assert!(matches!(rx.recv().await, Some(Message::Ping(_))));
}
