//! Live-update delivery.
//!
//! The [`LiveUpdateRouter`] subscribes to the event bus and pushes each
//! tracked-email change to the owner's open dashboard sockets.

pub mod router;

pub use router::LiveUpdateRouter;
