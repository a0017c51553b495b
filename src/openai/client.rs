use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::openai::credential::{API_KEY_ENV, Credential, credential_from_lookup, load_credential};
use crate::openai::error::{ConfigurationError, OperationError};
use crate::openai::transport::{DEFAULT_BASE_URL, Endpoint, HttpTransport, Transport};

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 150;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_RESPONSE_MODEL: &str = "gpt-5-nano";

/// Per-handle defaults used whenever a call does not override them.
#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub chat_model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub embedding_model: String,
    pub image_model: String,
    pub response_model: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            response_model: DEFAULT_RESPONSE_MODEL.to_string(),
        }
    }
}

/// Everything needed to build a live handle except the credential.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub defaults: Defaults,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

/// Configured handle to the provider. Read-only once built.
///
/// Request operations live in the `chat`, `embeddings`, `images` and
/// `responses` modules as methods on this type.
#[derive(Debug)]
pub struct ClientHandle<T = HttpTransport> {
    transport: T,
    defaults: Defaults,
}

impl ClientHandle<HttpTransport> {
    /// Builds a handle from `OPENAI_API_KEY`.
    pub fn from_env(settings: &ClientSettings) -> Result<Self, ConfigurationError> {
        let credential = load_credential(API_KEY_ENV)?;
        Self::new(credential, settings)
    }

    /// Builds a handle reading the credential through `lookup`.
    ///
    /// Nothing touches the network before the credential has been validated.
    pub fn from_lookup<F>(settings: &ClientSettings, lookup: F) -> Result<Self, ConfigurationError>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let credential = credential_from_lookup(API_KEY_ENV, lookup)?;
        Self::new(credential, settings)
    }

    pub fn new(
        credential: Credential,
        settings: &ClientSettings,
    ) -> Result<Self, ConfigurationError> {
        let transport = HttpTransport::new(credential, &settings.base_url, settings.timeout)?;
        tracing::debug!(base_url = %transport.base_url(), "client handle ready");
        Ok(Self::with_transport(transport, settings.defaults.clone()))
    }
}

impl<T: Transport> ClientHandle<T> {
    pub fn with_transport(transport: T, defaults: Defaults) -> Self {
        Self {
            transport,
            defaults,
        }
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends one request and decodes the reply into `R`.
    pub(crate) fn dispatch<P, R>(
        &self,
        endpoint: Endpoint,
        payload: &P,
    ) -> Result<R, OperationError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload)
            .map_err(|source| OperationError::Encode { endpoint, source })?;

        tracing::debug!(%endpoint, "sending request");
        let body = self
            .transport
            .call(endpoint, &payload)
            .inspect_err(|err| tracing::info!(%endpoint, error = %err, "request failed"))?;

        decode(endpoint, body)
    }
}

fn decode<R: DeserializeOwned>(endpoint: Endpoint, body: Value) -> Result<R, OperationError> {
    serde_json::from_value(body).map_err(|err| {
        tracing::info!(%endpoint, error = %err, "response did not match the expected shape");
        OperationError::malformed(endpoint, err.to_string())
    })
}
