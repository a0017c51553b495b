use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::openai::transport::Endpoint;

/// Faults detected before any request reaches the provider.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("{var} is not set in the environment or in a .env file")]
    MissingCredential { var: String },

    #[error("Failed to read config file '{}': {source}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file '{}' does not contain a [profiles] section.", path.display())]
    NoProfiles { path: PathBuf },

    #[error("Profile '{name}' not found in config file '{}'.", path.display())]
    UnknownProfile { name: String, path: PathBuf },

    #[error("Cannot resolve config path: set OT_CONFIG or HOME/XDG_CONFIG_HOME.")]
    NoConfigPath,

    #[error("Invalid {name} '{value}': {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failures surfaced by the remote API boundary.
///
/// Every request operation returns these as values; none of them is fatal.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {message}")]
    Api {
        endpoint: Endpoint,
        status: StatusCode,
        message: String,
    },

    #[error("unexpected response from {endpoint}: {detail}")]
    Malformed { endpoint: Endpoint, detail: String },

    #[error("failed to encode {endpoint} payload: {source}")]
    Encode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl OperationError {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Request { endpoint, .. }
            | Self::Api { endpoint, .. }
            | Self::Malformed { endpoint, .. }
            | Self::Encode { endpoint, .. } => *endpoint,
        }
    }

    pub(crate) fn malformed(endpoint: Endpoint, detail: impl Into<String>) -> Self {
        Self::Malformed {
            endpoint,
            detail: detail.into(),
        }
    }
}
