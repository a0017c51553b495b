use serde::{Deserialize, Serialize};

use crate::openai::client::{ClientHandle, Defaults};
use crate::openai::error::OperationError;
use crate::openai::transport::{Endpoint, Transport};

/// Embeddings payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: String,
}

impl EmbeddingRequest {
    pub fn build(defaults: &Defaults, text: &str, model: Option<&str>) -> Self {
        Self {
            model: model.unwrap_or(&defaults.embedding_model).to_string(),
            input: text.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

impl<T: Transport> ClientHandle<T> {
    /// Embeds `text` and returns the first vector exactly as the provider sent it.
    ///
    /// Failures only ever come back through `Err`; `Ok` with an empty vector
    /// means the provider really returned an empty embedding.
    pub fn embedding(&self, text: &str, model: Option<&str>) -> Result<Vec<f64>, OperationError> {
        let endpoint = Endpoint::Embeddings;
        let request = EmbeddingRequest::build(self.defaults(), text, model);
        let body: EmbeddingResponse = self.dispatch(endpoint, &request)?;

        body.data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| OperationError::malformed(endpoint, "response contained no embeddings"))
    }
}
