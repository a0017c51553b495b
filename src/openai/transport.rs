use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::openai::credential::Credential;
use crate::openai::error::{ConfigurationError, OperationError};

/// Default API root; endpoint paths are appended to it.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Remote endpoints reachable through a [`Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ChatCompletions,
    Embeddings,
    ImageGenerations,
    Responses,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::ChatCompletions => "/chat/completions",
            Self::Embeddings => "/embeddings",
            Self::ImageGenerations => "/images/generations",
            Self::Responses => "/responses",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// The provider boundary: one JSON payload in, one JSON document or an error out.
pub trait Transport {
    fn call(&self, endpoint: Endpoint, payload: &Value) -> Result<Value, OperationError>;
}

/// Blocking HTTPS transport with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    credential: Credential,
}

impl HttpTransport {
    pub fn new(
        credential: Credential,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, ConfigurationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ConfigurationError::HttpClient)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl Transport for HttpTransport {
    fn call(&self, endpoint: Endpoint, payload: &Value) -> Result<Value, OperationError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .bearer_auth(self.credential.expose())
            .json(payload)
            .send()
            .map_err(|source| OperationError::Request { endpoint, source })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(OperationError::Api {
                endpoint,
                status,
                message: api_error_message(&body),
            });
        }

        response
            .json::<Value>()
            .map_err(|source| OperationError::Request { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Prefers the provider's `error.message`, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}
