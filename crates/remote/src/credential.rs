//! Elevated-privilege secret for remote pixel writes.

use std::fmt;

/// Service credential for a remote backend.
///
/// Constructed once from configuration and handed to the store that needs
/// it. `Debug` never prints the secret, so the credential is safe to keep
/// inside configuration structs that get logged.
#[derive(Clone)]
pub struct ServiceCredential(String);

impl ServiceCredential {
    /// Wrap a secret. Returns `None` for a blank value.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    /// The raw secret, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ServiceCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServiceCredential(<redacted>)")
    }
}
