//! Mailsbe API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, pixel
//! endpoint, WebSocket live updates) so integration tests and the binary
//! entrypoint share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod live;
pub mod middleware;
pub mod pixel_backend;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ws;
