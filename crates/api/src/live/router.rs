//! Event-to-socket routing.

use std::sync::Arc;

use axum::extract::ws::Message;
use mailsbe_events::TrackingEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Routes tracking events to the owning user's WebSocket connections.
pub struct LiveUpdateRouter {
    ws_manager: Arc<WsManager>,
}

impl LiveUpdateRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the routing loop until the bus closes.
    ///
    /// Exits when every [`EventBus`](mailsbe_events::EventBus) handle has
    /// been dropped. A lagging receiver skips the missed events; the
    /// dashboard recovers them on its next list fetch.
    pub async fn run(self, mut receiver: broadcast::Receiver<TrackingEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Live-update router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, live-update router shutting down");
                    break;
                }
            }
        }
    }

    /// Push one event to its owner's sockets, returning how many received it.
    pub async fn deliver(&self, event: &TrackingEvent) -> usize {
        let frame = live_message(event);
        let delivered = self
            .ws_manager
            .send_to_user(event.owner_id, Message::Text(frame.to_string().into()))
            .await;

        tracing::debug!(
            event_type = %event.event_type,
            email_id = event.email_id,
            delivered,
            "Routed live update"
        );
        delivered
    }
}

/// JSON text frame sent to the dashboard for an event.
pub fn live_message(event: &TrackingEvent) -> serde_json::Value {
    serde_json::json!({
        "type": event.event_type,
        "email_id": event.email_id,
        "data": event.payload,
        "timestamp": event.timestamp,
    })
}
