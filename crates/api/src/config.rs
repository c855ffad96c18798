use std::time::Duration;

use axum::http::HeaderValue;
use mailsbe_remote::{
    PostgrestConfig, ServiceCredential, DEFAULT_OWNER_COLUMN, DEFAULT_TOKEN_COLUMN,
};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All non-secret fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed dashboard CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long shutdown waits for background tasks to drain (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT verification settings for dashboard requests.
    pub jwt: JwtConfig,
    /// Pixel endpoint settings.
    pub pixel: PixelConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    ///
    /// See [`JwtConfig::from_env`] and [`PixelConfig::from_lookup`] for the
    /// rest.
    ///
    /// # Panics
    ///
    /// Panics on an unparsable value, or when the pixel's worst case does not
    /// fit in the request timeout (see [`check_pixel_deadline`]).
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let pixel = PixelConfig::from_lookup(|key| std::env::var(key).ok());
        check_pixel_deadline(
            Duration::from_secs(request_timeout_secs),
            pixel.backend_timeout,
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            pixel,
        }
    }
}

/// Store calls a single pixel request can make: the conditional write, then
/// the lookup that classifies a no-op.
pub const PIXEL_STORE_CALLS_PER_REQUEST: u32 = 2;

/// Assert that a pixel request always finishes before the request timeout.
///
/// The timeout layer answers 408 with no body, so a pixel request cut off by
/// it would not get its image.
///
/// # Panics
///
/// Panics unless `PIXEL_STORE_CALLS_PER_REQUEST * backend_timeout` is
/// strictly less than `request_timeout`.
pub fn check_pixel_deadline(request_timeout: Duration, backend_timeout: Duration) {
    let worst_case = backend_timeout * PIXEL_STORE_CALLS_PER_REQUEST;
    assert!(
        worst_case < request_timeout,
        "PIXEL_BACKEND_TIMEOUT_MS ({} ms) x {PIXEL_STORE_CALLS_PER_REQUEST} must stay below \
         REQUEST_TIMEOUT_SECS ({} s)",
        backend_timeout.as_millis(),
        request_timeout.as_secs(),
    );
}

// ---------------------------------------------------------------------------
// Pixel endpoint
// ---------------------------------------------------------------------------

/// Default public location of the pixel endpoint.
pub const DEFAULT_PIXEL_BASE_URL: &str = "http://localhost:3000/update";

/// Default per-call bound on pixel store operations.
pub const DEFAULT_PIXEL_BACKEND_TIMEOUT_MS: u64 = 3000;

/// Default remote table name.
pub const DEFAULT_BACKEND_TABLE: &str = "tracked_emails";

/// Settings for the public pixel endpoint and its store.
#[derive(Debug, Clone)]
pub struct PixelConfig {
    /// Base of generated pixel URLs, e.g. `https://track.example.com/update`.
    pub base_url: String,
    /// Value of `Access-Control-Allow-Origin` on pixel responses.
    pub cors_origin: HeaderValue,
    /// Bound applied to each store call made while serving a pixel.
    pub backend_timeout: Duration,
    /// Which store records opens.
    pub backend: PixelBackend,
}

/// Store the pixel endpoint writes through.
#[derive(Debug, Clone)]
pub enum PixelBackend {
    /// The service's own PostgreSQL database.
    Postgres,
    /// A remote PostgREST-compatible data API.
    Postgrest(PostgrestConfig),
}

impl PixelConfig {
    /// Build pixel settings from a key lookup (the process environment in
    /// production).
    ///
    /// | Key                        | Default                          |
    /// |----------------------------|----------------------------------|
    /// | `PIXEL_BASE_URL`           | `http://localhost:3000/update`   |
    /// | `PIXEL_CORS_ORIGIN`        | `*`                              |
    /// | `PIXEL_BACKEND_TIMEOUT_MS` | `3000`                           |
    /// | `PIXEL_BACKEND`            | `postgres`                       |
    /// | `BACKEND_URL`              | required for `postgrest`         |
    /// | `SERVICE_CREDENTIAL`       | required for `postgrest`         |
    /// | `BACKEND_TABLE`            | `tracked_emails`                 |
    /// | `BACKEND_TOKEN_COLUMN`     | `tracking_token`                 |
    /// | `BACKEND_OWNER_COLUMN`     | `owner_id`                       |
    ///
    /// # Panics
    ///
    /// Panics on an unknown backend, an invalid origin or timeout, or a
    /// missing remote URL or credential.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("PIXEL_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PIXEL_BASE_URL.into());

        let origin = lookup("PIXEL_CORS_ORIGIN").unwrap_or_else(|| "*".into());
        let cors_origin = HeaderValue::from_str(origin.trim())
            .unwrap_or_else(|e| panic!("Invalid PIXEL_CORS_ORIGIN '{origin}': {e}"));

        let timeout_ms: u64 = lookup("PIXEL_BACKEND_TIMEOUT_MS")
            .unwrap_or_else(|| DEFAULT_PIXEL_BACKEND_TIMEOUT_MS.to_string())
            .parse()
            .expect("PIXEL_BACKEND_TIMEOUT_MS must be a valid u64");
        assert!(timeout_ms > 0, "PIXEL_BACKEND_TIMEOUT_MS must be positive");
        let backend_timeout = Duration::from_millis(timeout_ms);

        let backend = match lookup("PIXEL_BACKEND").as_deref().map(str::trim) {
            None | Some("") | Some("postgres") => PixelBackend::Postgres,
            Some("postgrest") => {
                let base_url = lookup("BACKEND_URL")
                    .filter(|v| !v.trim().is_empty())
                    .expect("BACKEND_URL must be set when PIXEL_BACKEND=postgrest");
                let credential = lookup("SERVICE_CREDENTIAL")
                    .and_then(ServiceCredential::new)
                    .expect("SERVICE_CREDENTIAL must be set when PIXEL_BACKEND=postgrest");
                let table = lookup("BACKEND_TABLE")
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_BACKEND_TABLE.into());
                let column = |key: &str, default: &str| {
                    lookup(key)
                        .map(|v| v.trim().to_string())
                        .filter(|v| !v.is_empty())
                        .unwrap_or_else(|| default.into())
                };
                PixelBackend::Postgrest(PostgrestConfig {
                    base_url,
                    table,
                    token_column: column("BACKEND_TOKEN_COLUMN", DEFAULT_TOKEN_COLUMN),
                    owner_column: column("BACKEND_OWNER_COLUMN", DEFAULT_OWNER_COLUMN),
                    credential,
                    timeout: backend_timeout,
                })
            }
            Some(other) => panic!("Unknown PIXEL_BACKEND '{other}' (expected postgres or postgrest)"),
        };

        Self {
            base_url,
            cors_origin,
            backend_timeout,
            backend,
        }
    }
}
