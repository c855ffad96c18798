//! Tracking token generation and inbound token bounds.
//!
//! Tokens are opaque to everything but the lookup: the pixel endpoint accepts
//! any non-blank string up to [`MAX_INBOUND_TOKEN_LEN`] bytes, so records
//! created by older clients with timestamp tokens still resolve.

use rand::Rng;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of a generated token. 22 alphanumeric characters carry ~131 bits.
pub const TOKEN_LENGTH: usize = 22;

/// Longest inbound token the pixel endpoint will look up.
pub const MAX_INBOUND_TOKEN_LEN: usize = 256;

/// Create attempts before a token collision is reported as a conflict.
pub const MAX_GENERATION_ATTEMPTS: usize = 3;

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate a new random tracking token from the thread-local CSPRNG.
pub fn generate() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Inbound bounds
// ---------------------------------------------------------------------------

/// Normalize a token received on the pixel endpoint.
///
/// Returns `None` for blank or oversized values, which the endpoint treats
/// the same as a missing token.
pub fn normalize_inbound(raw: Option<&str>) -> Option<&str> {
    let token = raw?.trim();
    if token.is_empty() || token.len() > MAX_INBOUND_TOKEN_LEN {
        return None;
    }
    Some(token)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
