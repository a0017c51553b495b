use serde::{Deserialize, Serialize};

use crate::openai::client::{ClientHandle, Defaults};
use crate::openai::error::OperationError;
use crate::openai::transport::{Endpoint, Transport};
use crate::openai::turn::Turn;

/// Per-call overrides; `None` falls back to the handle defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionOverrides {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub system_prompt: Option<String>,
}

impl CompletionOverrides {
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}

/// Chat-completions payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Turn>,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl ChatCompletionRequest {
    pub fn build(defaults: &Defaults, message: &str, overrides: &CompletionOverrides) -> Self {
        Self {
            model: overrides
                .model
                .clone()
                .unwrap_or_else(|| defaults.chat_model.clone()),
            messages: assemble_turns(message, overrides.system_prompt.as_deref()),
            max_tokens: overrides.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: overrides.temperature.unwrap_or(defaults.temperature),
        }
    }
}

/// System turn first when a non-blank prompt is given, then exactly one user turn.
pub fn assemble_turns(message: &str, system_prompt: Option<&str>) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(2);
    if let Some(system) = system_prompt.filter(|prompt| !prompt.trim().is_empty()) {
        turns.push(Turn::system(system));
    }
    turns.push(Turn::user(message));
    turns
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// A completion together with the metadata the provider reported.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
    pub model: Option<String>,
    pub usage: Option<Usage>,
}

impl<T: Transport> ClientHandle<T> {
    /// Sends `message` (plus an optional system prompt) and returns the first
    /// choice's text.
    pub fn text_completion(
        &self,
        message: &str,
        overrides: &CompletionOverrides,
    ) -> Result<String, OperationError> {
        self.complete(message, overrides)
            .map(|completion| completion.content)
    }

    /// Like [`ClientHandle::text_completion`] but keeps model and usage.
    pub fn complete(
        &self,
        message: &str,
        overrides: &CompletionOverrides,
    ) -> Result<Completion, OperationError> {
        let endpoint = Endpoint::ChatCompletions;
        let request = ChatCompletionRequest::build(self.defaults(), message, overrides);
        let body: ChatCompletionResponse = self.dispatch(endpoint, &request)?;

        let content = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| OperationError::malformed(endpoint, "response contained no choices"))?
            .message
            .content
            .ok_or_else(|| {
                OperationError::malformed(endpoint, "first choice has no message content")
            })?;

        Ok(Completion {
            content,
            model: body.model,
            usage: body.usage,
        })
    }
}
