use std::env;
use std::fmt;

use crate::openai::error::ConfigurationError;

/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// API secret. Never printed, not even through `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a secret, rejecting blank values.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Reads the credential from the process environment.
pub fn load_credential(var: &str) -> Result<Credential, ConfigurationError> {
    credential_from_lookup(var, |name| env::var(name).ok())
}

/// Reads the credential through `lookup`, failing when it is unset or blank.
pub fn credential_from_lookup<F>(var: &str, lookup: F) -> Result<Credential, ConfigurationError>
where
    F: FnOnce(&str) -> Option<String>,
{
    lookup(var)
        .and_then(Credential::new)
        .ok_or_else(|| ConfigurationError::MissingCredential {
            var: var.to_string(),
        })
}
