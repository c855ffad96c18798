//! WebSocket infrastructure for dashboard live updates.
//!
//! Provides connection management, heartbeat pings, and the authenticated
//! upgrade handler.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
