//! OpenAI Adapter
//!
//! OpenAI-compatible chat completions adapter.

use async_trait::async_trait;
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::llm::adapters::transport::{HttpTransport, ReqwestTransport, Transport};
use crate::llm::adapters::{
    AdapterError, ExecutionContext, Provider, ProviderCall, ProviderResponse,
};
use crate::llm::message::Message;
use crate::llm::request::{ResponseFormat, ToolDefinition};

// Public parsing module (re-exported for testing)
pub use crate::llm::adapters::openai_parse::parse_chat_completion;

/// Models that reject a custom sampling temperature
pub const NO_CUSTOM_TEMPERATURE_MODELS: &[&str] =
    &["o1", "o1-mini", "o1-preview", "o3", "o3-mini", "o4-mini"];

/// Whether `model` accepts a `temperature` parameter
///
/// Dated snapshots (`o3-mini-2025-01-31`) belong to their family.
pub fn supports_custom_temperature(model: &str) -> bool {
    !NO_CUSTOM_TEMPERATURE_MODELS.iter().any(|family| {
        model == *family
            || model
                .strip_prefix(family)
                .is_some_and(|rest| rest.starts_with('-'))
    })
}

/// OpenAI-compatible adapter
#[derive(Debug)]
pub struct OpenAiAdapter {
    /// Base URL (e.g., https://api.openai.com/v1)
    base_url: String,
    /// API key
    api_key: String,
    /// Execution context guard
    context: ExecutionContext,
    /// HTTP transport
    transport: Transport,
}

impl OpenAiAdapter {
    /// Create new OpenAI adapter
    pub fn new(base_url: String, api_key: String) -> Result<Self, AdapterError> {
        Ok(Self::with_transport(
            base_url,
            api_key,
            Transport::Real(ReqwestTransport::new()?),
        ))
    }

    /// Create adapter with custom transport (for testing)
    pub fn with_transport(base_url: String, api_key: String, transport: Transport) -> Self {
        Self {
            base_url,
            api_key,
            context: ExecutionContext::Server,
            transport,
        }
    }

    /// Set the execution context the adapter runs in
    pub fn in_context(mut self, context: ExecutionContext) -> Self {
        self.context = context;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Build chat completions request body
    pub fn build_request(&self, call: &ProviderCall<'_>) -> JsonValue {
        let mut body = Map::new();
        body.insert("model".to_string(), JsonValue::from(call.model));
        body.insert(
            "messages".to_string(),
            JsonValue::Array(call.messages.iter().map(wire_message).collect()),
        );

        if let Some(temperature) = call.sampling.temperature {
            if supports_custom_temperature(call.model) {
                body.insert("temperature".to_string(), JsonValue::from(temperature));
            } else {
                debug!(model = call.model, "omitting temperature for model");
            }
        }
        if let Some(max_tokens) = call.sampling.max_tokens {
            body.insert("max_tokens".to_string(), JsonValue::from(max_tokens));
        }
        if let Some(top_p) = call.sampling.top_p {
            body.insert("top_p".to_string(), JsonValue::from(top_p));
        }

        if call.response_format == ResponseFormat::JsonObject {
            body.insert(
                "response_format".to_string(),
                serde_json::json!({"type": "json_object"}),
            );
        }

        if !call.tools.is_empty() {
            body.insert(
                "tools".to_string(),
                JsonValue::Array(call.tools.iter().map(wire_tool).collect()),
            );
            body.insert("tool_choice".to_string(), JsonValue::from("auto"));
        }

        JsonValue::Object(body)
    }
}

fn wire_message(msg: &Message) -> JsonValue {
    let mut wire = serde_json::json!({
        "role": msg.role.as_str(),
        "content": msg.content,
    });
    if let Some(name) = &msg.name {
        wire["name"] = JsonValue::from(name.as_str());
    }
    wire
}

fn wire_tool(tool: &ToolDefinition) -> JsonValue {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": tool.name,
            "description": tool.description,
            "parameters": tool.parameters,
        }
    })
}

#[async_trait]
impl Provider for OpenAiAdapter {
    async fn complete(&self, call: ProviderCall<'_>) -> Result<ProviderResponse, AdapterError> {
        if self.context != ExecutionContext::Server {
            return Err(AdapterError::ServerOnlyOperation);
        }

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let body = self.build_request(&call).to_string();

        let auth_header = format!("Bearer {}", self.api_key);
        let headers = [
            ("Authorization", auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let response = self.transport.post_json(&url, &headers, &body).await?;
        parse_chat_completion(&response)
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
