use std::cell::RefCell;
use std::collections::VecDeque;

use reqwest::StatusCode;
use serde_json::Value;

use crate::openai::client::{ClientHandle, Defaults};
use crate::openai::error::OperationError;
use crate::openai::transport::{Endpoint, Transport};

enum Scripted {
    Reply(Value),
    Fail(StatusCode, String),
}

/// Records every call and replays scripted replies in order.
#[derive(Default)]
pub(crate) struct FakeTransport {
    script: RefCell<VecDeque<Scripted>>,
    calls: RefCell<Vec<(Endpoint, Value)>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, body: Value) -> Self {
        self.script.borrow_mut().push_back(Scripted::Reply(body));
        self
    }

    pub(crate) fn fail(self, status: StatusCode, message: &str) -> Self {
        self.script
            .borrow_mut()
            .push_back(Scripted::Fail(status, message.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(Endpoint, Value)> {
        self.calls.borrow().clone()
    }

    pub(crate) fn into_handle(self) -> ClientHandle<FakeTransport> {
        ClientHandle::with_transport(self, Defaults::default())
    }
}

impl Transport for FakeTransport {
    fn call(&self, endpoint: Endpoint, payload: &Value) -> Result<Value, OperationError> {
        self.calls.borrow_mut().push((endpoint, payload.clone()));
        match self.script.borrow_mut().pop_front() {
            Some(Scripted::Reply(body)) => Ok(body),
            Some(Scripted::Fail(status, message)) => Err(OperationError::Api {
                endpoint,
                status,
                message,
            }),
            None => Err(OperationError::malformed(endpoint, "no scripted reply")),
        }
    }
}

pub(crate) fn chat_reply(content: &str) -> Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o-mini-2024-07-18",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
    })
}
