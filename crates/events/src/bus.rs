//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`TrackingEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use mailsbe_core::types::{DbId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A tracked email was created from the dashboard.
pub const EMAIL_CREATED: &str = "email.created";

/// A tracked email was opened for the first time.
pub const EMAIL_SEEN: &str = "email.seen";

/// A tracked email was deleted from the dashboard.
pub const EMAIL_DELETED: &str = "email.deleted";

// ---------------------------------------------------------------------------
// TrackingEvent
// ---------------------------------------------------------------------------

/// A change to a tracked email, addressed to the email's owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// Dot-separated event name, one of the `EMAIL_*` constants.
    pub event_type: String,

    /// Owner of the tracked email; only this user's connections receive it.
    pub owner_id: UserId,

    /// The tracked email the event is about.
    pub email_id: DbId,

    /// JSON representation of the record (or the subset the publisher has).
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl TrackingEvent {
    /// Create an event with an empty payload.
    pub fn new(event_type: impl Into<String>, owner_id: UserId, email_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            owner_id,
            email_id,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use mailsbe_events::bus::{EventBus, TrackingEvent, EMAIL_CREATED};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(TrackingEvent::new(EMAIL_CREATED, uuid::Uuid::nil(), 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<TrackingEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: TrackingEvent) {
        // Ignore the SendError, it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<TrackingEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
