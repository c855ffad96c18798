//! Mailsbe domain core.
//!
//! Pure domain logic with no database or HTTP dependencies:
//!
//! - [`pixel`] -- the canonical 1x1 transparent GIF and its response headers.
//! - [`tracking_token`] -- random token generation and inbound token bounds.
//! - [`pagination`] -- limit/offset clamping for list endpoints.
//! - [`recipient`] -- create-input validation for tracked emails.
//! - [`snippet`] -- pixel URL and paste-able HTML snippet rendering.
//! - [`store`] -- the [`store::PixelStore`] data-access trait.
//! - [`open_tracking`] -- the first-open recording routine used by the pixel endpoint.

pub mod error;
pub mod open_tracking;
pub mod pagination;
pub mod pixel;
pub mod recipient;
pub mod snippet;
pub mod store;
pub mod tracking_token;
pub mod types;
