//! Thin wrapper over the provider's HTTP API.
//!
//! A [`ClientHandle`] owns the transport and the default parameters; the four
//! request operations are methods on it and report failures as
//! [`OperationError`] values.

/// Chat-completions operation.
pub mod chat;
/// Client handle and defaults.
pub mod client;
/// Credential loading.
pub mod credential;
/// Embeddings operation.
pub mod embeddings;
/// Error types for configuration and request failures.
pub mod error;
/// Image-generation operation.
pub mod images;
/// Responses endpoint and stored prompt templates.
pub mod responses;
/// Provider boundary and its HTTP implementation.
pub mod transport;
/// Role-tagged conversation turns.
pub mod turn;

#[cfg(test)]
pub(crate) mod fake;

pub use chat::{Completion, CompletionOverrides, Usage};
pub use client::{ClientHandle, ClientSettings, Defaults};
pub use credential::{API_KEY_ENV, Credential, load_credential};
pub use embeddings::EmbeddingRequest;
pub use error::{ConfigurationError, OperationError};
pub use images::{ImageOptions, ImageQuality, ImageSize};
pub use responses::{PromptTemplate, ReasoningEffort, ResponseInput, ResponseOptions};
pub use transport::{Endpoint, HttpTransport, Transport};
pub use turn::{Role, Turn};
