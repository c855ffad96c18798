//! Remote backends for the pixel endpoint.
//!
//! - [`credential`] -- the redacted service credential capability.
//! - [`postgrest`] -- a [`PixelStore`](mailsbe_core::store::PixelStore) over a
//!   PostgREST-compatible HTTP API (e.g. a hosted Supabase project).

pub mod credential;
pub mod postgrest;

pub use credential::ServiceCredential;
pub use postgrest::{
    PostgrestConfig, PostgrestPixelStore, DEFAULT_OWNER_COLUMN, DEFAULT_TOKEN_COLUMN,
};
