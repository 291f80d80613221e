//! LLM Adapters
//!
//! Provider-agnostic interface for LLM HTTP APIs. An adapter performs exactly
//! one request/response round trip per call: no caching, no retries.

pub mod factory;
pub mod openai;
pub mod openai_parse;
pub mod stub;
pub mod transport;
pub mod transport_fake;
pub mod transport_reqwest;
pub mod transport_types;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::llm::message::Message;
use crate::llm::request::{ResponseFormat, SamplingParams, ToolDefinition};

// Re-export common types
pub use factory::create_provider;
pub use openai::OpenAiAdapter;
pub use stub::{CapturedCall, ScriptedProvider, ScriptedReply};
pub use transport::{AdapterError, HttpTransport, Transport};

/// Where the process is running
///
/// Credentialed completions only run in the server context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionContext {
    #[default]
    Server,
    Client,
}

/// One provider round trip
#[derive(Debug, Clone, Copy)]
pub struct ProviderCall<'a> {
    pub model: &'a str,
    pub messages: &'a [Message],
    pub sampling: SamplingParams,
    pub response_format: ResponseFormat,
    pub tools: &'a [ToolDefinition],
}

/// Tool call exactly as the provider returned it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToolCall {
    pub id: String,
    pub name: String,
    /// Arguments as the raw JSON text the model produced
    pub arguments: String,
}

/// Raw provider response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<RawToolCall>,
}

impl ProviderResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: Vec::new(),
        }
    }
}

/// LLM provider
///
/// Errors are surfaced unmodified; classification and recovery belong to the
/// caller.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, call: ProviderCall<'_>) -> Result<ProviderResponse, AdapterError>;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
