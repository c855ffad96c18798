use std::sync::Arc;

use mailsbe_core::store::PixelStore;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for the dashboard API.
    pub pool: mailsbe_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (dashboard clients).
    pub ws_manager: Arc<WsManager>,
    /// Event bus carrying tracked-email changes to the live-update router.
    pub event_bus: Arc<mailsbe_events::EventBus>,
    /// Backend the pixel endpoint records opens through.
    pub pixel_store: Arc<dyn PixelStore>,
}
