//! Structured Completion Engine
//!
//! One provider call, JSON required, contract enforced. Single-shot: retry
//! policy lives in [`crate::retry`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::contract::ResponseContract;
use crate::error::{AiError, MalformedOutput};
use crate::llm::adapters::{Provider, ProviderCall};
use crate::llm::message::validate_messages;
use crate::llm::request::{CompletionRequest, ResponseFormat, ToolInvocation, ToolRequest};

/// Free-form completion with any tool invocations the model requested
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallOutput {
    pub content: String,
    pub tool_calls: Vec<ToolInvocation>,
}

/// Structured completion engine
#[derive(Debug)]
pub struct StructuredCompletionEngine<P> {
    provider: Arc<P>,
}

impl<P> Clone for StructuredCompletionEngine<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P: Provider> StructuredCompletionEngine<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Obtain a contract-conformant value from one provider call
    pub async fn complete<C: ResponseContract>(
        &self,
        request: &CompletionRequest<C>,
    ) -> Result<C::Output, AiError> {
        let contract = request.contract.as_deref().ok_or_else(|| {
            AiError::invalid_input("contract", "structured completion requires a response contract")
        })?;
        validate_messages(&request.messages)?;

        let call = ProviderCall {
            model: &request.model,
            messages: &request.messages,
            sampling: request.sampling,
            response_format: ResponseFormat::JsonObject,
            tools: &[],
        };
        let response = self.provider.complete(call).await?;

        let content = response
            .content
            .filter(|c| !c.trim().is_empty())
            .ok_or(MalformedOutput::Empty)?;
        let raw: serde_json::Value =
            serde_json::from_str(&content).map_err(MalformedOutput::Json)?;

        match contract.validate(&raw) {
            Ok(value) => {
                debug!(contract = contract.name(), model = %request.model, "response accepted");
                Ok(value)
            }
            Err(violations) => {
                warn!(
                    contract = contract.name(),
                    model = %request.model,
                    violations = violations.len(),
                    "response rejected by contract"
                );
                Err(AiError::SchemaViolation {
                    contract: contract.name().to_string(),
                    violations,
                })
            }
        }
    }

    /// Free-form completion offering callable tools
    pub async fn complete_with_tools(
        &self,
        request: &ToolRequest,
    ) -> Result<ToolCallOutput, AiError> {
        validate_messages(&request.messages)?;

        let call = ProviderCall {
            model: &request.model,
            messages: &request.messages,
            sampling: request.sampling,
            response_format: ResponseFormat::Text,
            tools: &request.tools,
        };
        let response = self.provider.complete(call).await?;

        let content = response.content.unwrap_or_default();
        if content.trim().is_empty() && response.tool_calls.is_empty() {
            return Err(MalformedOutput::Empty.into());
        }

        let tool_calls = response
            .tool_calls
            .into_iter()
            .map(|raw| {
                let arguments = if raw.arguments.trim().is_empty() {
                    serde_json::Value::Object(serde_json::Map::new())
                } else {
                    serde_json::from_str(&raw.arguments).map_err(MalformedOutput::Json)?
                };
                Ok(ToolInvocation {
                    id: raw.id,
                    name: raw.name,
                    arguments,
                })
            })
            .collect::<Result<Vec<_>, AiError>>()?;

        Ok(ToolCallOutput { content, tool_calls })
    }
}
