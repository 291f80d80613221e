//! Completion requests
//!
//! Built fresh for every provider call and never mutated afterwards.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::llm::message::Message;

/// Sampling parameters forwarded to the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SamplingParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl SamplingParams {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..Self::default()
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Output format the provider is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free text (and tool calls)
    Text,
    /// A single JSON object
    JsonObject,
}

/// Callable tool offered to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema of the tool arguments
    #[serde(default = "empty_object_schema")]
    pub parameters: JsonValue,
}

fn empty_object_schema() -> JsonValue {
    serde_json::json!({"type": "object", "properties": {}})
}

/// Tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub arguments: JsonValue,
}

/// Structured completion request
///
/// `contract` is optional only so that a missing contract is representable;
/// the engine refuses to run without one.
#[derive(Debug)]
pub struct CompletionRequest<C> {
    pub model: String,
    pub messages: Vec<Message>,
    pub contract: Option<Arc<C>>,
    pub sampling: SamplingParams,
}

impl<C> CompletionRequest<C> {
    pub fn new(model: impl Into<String>, messages: Vec<Message>, contract: Arc<C>) -> Self {
        Self {
            model: model.into(),
            messages,
            contract: Some(contract),
            sampling: SamplingParams::default(),
        }
    }

    pub fn with_sampling(mut self, sampling: SamplingParams) -> Self {
        self.sampling = sampling;
        self
    }
}

/// Free-form completion request with callable tools
#[derive(Debug, Clone)]
pub struct ToolRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolDefinition>,
    pub sampling: SamplingParams,
}
