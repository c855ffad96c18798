//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the authenticated dashboard user.

pub mod auth;
