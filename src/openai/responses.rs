use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::openai::client::{ClientHandle, Defaults};
use crate::openai::error::OperationError;
use crate::openai::transport::{Endpoint, Transport};
use crate::openai::turn::Turn;

/// How much internal reasoning the model may spend before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Minimal,
    Low,
    Medium,
    High,
}

impl FromStr for ReasoningEffort {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!(
                "unsupported reasoning effort '{value}'. \
                 Supported values: minimal, low, medium, high."
            )),
        }
    }
}

/// Reference to a prompt stored on the provider side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptTemplate {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl PromptTemplate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            variables: BTreeMap::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }
}

/// Accepted call shapes for the responses endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseInput {
    /// Separate `instructions` field plus a plain input string.
    Instructions { instructions: String, input: String },
    /// Role-tagged turns sent as the `input` list.
    Turns(Vec<Turn>),
    /// A stored prompt; its variables are substituted provider side.
    Template(PromptTemplate),
}

impl ResponseInput {
    pub fn flat(instructions: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Instructions {
            instructions: instructions.into(),
            input: input.into(),
        }
    }

    /// Folds the instructions into a developer turn followed by a user turn.
    pub fn developer_turns(instructions: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Turns(vec![Turn::developer(instructions), Turn::user(input)])
    }

    /// The turns the model effectively receives. Empty for templates, whose
    /// content is only known to the provider.
    pub fn effective_turns(&self) -> Vec<Turn> {
        match self {
            Self::Instructions {
                instructions,
                input,
            } => vec![Turn::developer(instructions.as_str()), Turn::user(input.as_str())],
            Self::Turns(turns) => turns.clone(),
            Self::Template(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseOptions {
    pub model: Option<String>,
    pub reasoning_effort: Option<ReasoningEffort>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestInput {
    Text(String),
    Turns(Vec<Turn>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reasoning {
    pub effort: ReasoningEffort,
}

/// Responses payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRequest {
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<RequestInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Reasoning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<PromptTemplate>,
}

impl ResponseRequest {
    pub fn build(defaults: &Defaults, input: &ResponseInput, options: &ResponseOptions) -> Self {
        let mut request = Self {
            model: options
                .model
                .clone()
                .unwrap_or_else(|| defaults.response_model.clone()),
            instructions: None,
            input: None,
            reasoning: options.reasoning_effort.map(|effort| Reasoning { effort }),
            prompt: None,
        };

        match input {
            ResponseInput::Instructions {
                instructions,
                input,
            } => {
                request.instructions = Some(instructions.clone());
                request.input = Some(RequestInput::Text(input.clone()));
            }
            ResponseInput::Turns(turns) => request.input = Some(RequestInput::Turns(turns.clone())),
            ResponseInput::Template(template) => request.prompt = Some(template.clone()),
        }
        request
    }
}

#[derive(Debug, Deserialize)]
struct ResponseBody {
    output_text: Option<String>,
    output: Option<Vec<OutputItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputItem {
    Message {
        #[serde(default)]
        content: Vec<OutputContent>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputContent {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

/// Concatenates every `output_text` part of every message item, in order.
fn aggregate_output_text(items: Vec<OutputItem>) -> String {
    items
        .into_iter()
        .filter_map(|item| match item {
            OutputItem::Message { content } => Some(content),
            OutputItem::Other => None,
        })
        .flatten()
        .filter_map(|part| match part {
            OutputContent::OutputText { text } => Some(text),
            OutputContent::Other => None,
        })
        .collect()
}

impl<T: Transport> ClientHandle<T> {
    /// Instructions-plus-input call in the flat form.
    pub fn structured_response(
        &self,
        instructions: &str,
        input: &str,
        reasoning_effort: Option<ReasoningEffort>,
    ) -> Result<String, OperationError> {
        let options = ResponseOptions {
            model: None,
            reasoning_effort,
        };
        self.respond(&ResponseInput::flat(instructions, input), &options)
    }

    /// Calls the responses endpoint with any supported input shape and
    /// returns the aggregated output text.
    pub fn respond(
        &self,
        input: &ResponseInput,
        options: &ResponseOptions,
    ) -> Result<String, OperationError> {
        let endpoint = Endpoint::Responses;
        let request = ResponseRequest::build(self.defaults(), input, options);
        let body: ResponseBody = self.dispatch(endpoint, &request)?;

        match (body.output_text, body.output) {
            (Some(text), _) => Ok(text),
            (None, Some(items)) => Ok(aggregate_output_text(items)),
            (None, None) => Err(OperationError::malformed(
                endpoint,
                "response has neither output nor output_text",
            )),
        }
    }
}
