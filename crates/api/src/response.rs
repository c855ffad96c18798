//! Response envelope and payload types shared by the dashboard handlers.
//!
//! Successful API responses are wrapped as `{ "data": ... }`.

use mailsbe_db::models::tracked_email::TrackedEmail;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Payload returned when a tracked email is created.
///
/// Carries everything the dashboard needs to show the user what to paste
/// into the outgoing email.
#[derive(Debug, Serialize)]
pub struct CreatedTrackedEmail {
    pub email: TrackedEmail,
    /// Absolute URL of the tracking pixel for this email.
    pub pixel_url: String,
    /// HTML fragment embedding the pixel.
    pub snippet: String,
}
