//! Mailsbe in-process event bus.
//!
//! - [`EventBus`] -- publish/subscribe hub backed by `tokio::sync::broadcast`.
//! - [`TrackingEvent`] -- a change to one owner's tracked email.
//!
//! Handlers publish after a successful write; the API's live-update router
//! subscribes and fans events out to the owner's WebSocket connections.

pub mod bus;

pub use bus::{EventBus, TrackingEvent};
