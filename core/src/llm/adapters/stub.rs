//! Scripted provider
//!
//! Provider-level stand-in that returns scripted outcomes without network
//! calls. Used by integration tests to drive the engine and retry controller.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::adapters::{AdapterError, Provider, ProviderCall, ProviderResponse, RawToolCall};
use crate::llm::request::ResponseFormat;

/// Scripted outcome of one provider call
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedReply {
    /// Text content (e.g. a JSON document)
    Content(String),
    /// No content at all
    Empty,
    /// Tool calls with optional accompanying text
    ToolCalls {
        content: Option<String>,
        calls: Vec<RawToolCall>,
    },
    /// 429-class failure
    RateLimited,
    /// Connection-level failure
    NetworkError(String),
    /// Rejected credentials
    AuthenticationFailed,
}

impl ScriptedReply {
    /// Serialize `value` as the reply content
    pub fn json(value: &serde_json::Value) -> Self {
        ScriptedReply::Content(value.to_string())
    }

    fn into_outcome(self) -> Result<ProviderResponse, AdapterError> {
        match self {
            ScriptedReply::Content(content) => Ok(ProviderResponse::text(content)),
            ScriptedReply::Empty => Ok(ProviderResponse::default()),
            ScriptedReply::ToolCalls { content, calls } => Ok(ProviderResponse {
                content,
                tool_calls: calls,
            }),
            ScriptedReply::RateLimited => Err(AdapterError::RateLimited { retry_after: None }),
            ScriptedReply::NetworkError(msg) => Err(AdapterError::Network(msg)),
            ScriptedReply::AuthenticationFailed => {
                Err(AdapterError::Authentication("invalid api key".to_string()))
            }
        }
    }
}

/// What the provider was asked to do
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedCall {
    pub model: String,
    pub temperature: Option<f32>,
    pub response_format: ResponseFormat,
    pub message_count: usize,
    pub tool_names: Vec<String>,
}

/// Provider returning scripted replies in order; the last reply repeats
#[derive(Debug)]
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: Mutex<Vec<CapturedCall>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Provider that answers every call with `reply`
    pub fn always(reply: ScriptedReply) -> Self {
        Self::new(vec![reply])
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<CapturedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Models used by each call, in order
    pub fn models(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }

    fn next_reply(&self) -> ScriptedReply {
        let mut replies = match self.replies.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.unwrap_or(ScriptedReply::Empty)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, call: ProviderCall<'_>) -> Result<ProviderResponse, AdapterError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(CapturedCall {
                model: call.model.to_string(),
                temperature: call.sampling.temperature,
                response_format: call.response_format,
                message_count: call.messages.len(),
                tool_names: call.tools.iter().map(|t| t.name.clone()).collect(),
            });
        }
        self.next_reply().into_outcome()
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}
