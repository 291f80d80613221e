//! AI service facade
//!
//! Wires the catalog, engine, retry controller and degradation policy into
//! the five planning operations. Every operation returns either a
//! contract-conformant value or its fallback; `Err` is reserved for caller
//! errors.

use std::sync::Arc;
use std::time::Instant;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::catalog::{
    AssumptionValidation, Assumptions, FunctionalBlocks, OperationCatalog, OperationDescriptor,
    ProjectContext, ProjectSchedule, ProjectSuggestions, ScheduleInput, SuggestionInput,
    ToolCompletion, ToolCompletionInput,
};
use crate::classifier::DegradationPolicy;
use crate::config::AiConfig;
use crate::contract::ContractError;
use crate::engine::StructuredCompletionEngine;
use crate::error::AiError;
use crate::llm::adapters::{create_provider, AdapterError, OpenAiAdapter, Provider};
use crate::retry::{RetryController, RetryPolicy};

/// Service construction errors
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Provider setup failed: {0}")]
    Provider(#[from] AdapterError),

    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Planning operations backed by an LLM provider
#[derive(Debug)]
pub struct AiService<P = OpenAiAdapter> {
    engine: StructuredCompletionEngine<P>,
    retry: RetryController,
    degradation: DegradationPolicy,
    catalog: Arc<OperationCatalog>,
    default_model: String,
}

impl<P> Clone for AiService<P> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            retry: self.retry.clone(),
            degradation: self.degradation,
            catalog: Arc::clone(&self.catalog),
            default_model: self.default_model.clone(),
        }
    }
}

impl AiService<OpenAiAdapter> {
    /// Service talking to the provider described by `config`
    pub fn from_config(config: &AiConfig) -> Result<Self, SetupError> {
        let provider = create_provider(config)?;
        info!(
            provider = %config.provider,
            default_model = %config.default_model,
            fallback_model = %config.fallback_model,
            "AI service configured"
        );
        Ok(Self::new(
            provider,
            &config.default_model,
            &config.fallback_model,
        )?)
    }
}

impl<P: Provider> AiService<P> {
    pub fn new(
        provider: P,
        default_model: impl Into<String>,
        fallback_model: impl Into<String>,
    ) -> Result<Self, ContractError> {
        Ok(Self {
            engine: StructuredCompletionEngine::new(Arc::new(provider)),
            retry: RetryController::new(fallback_model),
            degradation: DegradationPolicy,
            catalog: Arc::new(OperationCatalog::new()?),
            default_model: default_model.into(),
        })
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = RetryController::with_policy(policy, self.retry.fallback_model());
        self
    }

    pub fn provider(&self) -> &P {
        self.engine.provider()
    }

    pub fn catalog(&self) -> &OperationCatalog {
        &self.catalog
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Review project assumptions for gaps and contradictions
    pub async fn validate_assumptions(
        &self,
        assumptions: &Assumptions,
    ) -> Result<AssumptionValidation, AiError> {
        self.run_structured(&self.catalog.validate_assumptions, assumptions)
            .await
    }

    /// Improvement suggestions for a project
    pub async fn generate_project_suggestions(
        &self,
        input: &SuggestionInput,
    ) -> Result<ProjectSuggestions, AiError> {
        self.run_structured(&self.catalog.project_suggestions, input)
            .await
    }

    /// Break a project into functional blocks
    pub async fn generate_functional_blocks(
        &self,
        project: &ProjectContext,
    ) -> Result<FunctionalBlocks, AiError> {
        self.run_structured(&self.catalog.functional_blocks, project)
            .await
    }

    /// Order functional blocks into delivery stages
    pub async fn generate_schedule(
        &self,
        input: &ScheduleInput,
    ) -> Result<ProjectSchedule, AiError> {
        self.run_structured(&self.catalog.schedule, input).await
    }

    /// Chat turn in which the model may request tool invocations
    pub async fn complete_with_tools(
        &self,
        input: &ToolCompletionInput,
    ) -> Result<ToolCompletion, AiError> {
        let descriptor = &self.catalog.tool_calling;
        descriptor.validate_input(input)?;

        let started = Instant::now();
        let engine = &self.engine;
        let outcome = self
            .retry
            .run(&self.default_model, |state| {
                let request = descriptor.request(state.current_model(), input);
                async move { engine.complete_with_tools(&request).await }
            })
            .await
            .map(|output| ToolCompletion {
                message: output.content,
                tool_calls: output.tool_calls,
            });
        log_outcome(descriptor.name, started, outcome.is_ok());

        self.degradation
            .resolve(descriptor.name, outcome, descriptor.fallback)
    }

    async fn run_structured<I, O>(
        &self,
        descriptor: &OperationDescriptor<I, O>,
        input: &I,
    ) -> Result<O, AiError>
    where
        I: Sync,
        O: JsonSchema + DeserializeOwned + Send,
    {
        (descriptor.validate_input)(input)?;
        let messages = descriptor.messages(input);
        debug!(
            operation = descriptor.name,
            messages = messages.len(),
            "running structured operation"
        );

        let started = Instant::now();
        let engine = &self.engine;
        let messages = &messages;
        let outcome = self
            .retry
            .run(&self.default_model, |state| {
                let request = descriptor.request(state.current_model(), messages.clone());
                async move { engine.complete(&request).await }
            })
            .await;
        log_outcome(descriptor.name, started, outcome.is_ok());

        self.degradation
            .resolve(descriptor.name, outcome, || (descriptor.fallback)(input))
    }
}

fn log_outcome(operation: &str, started: Instant, ok: bool) {
    info!(
        operation,
        elapsed_ms = started.elapsed().as_millis() as u64,
        ok,
        "operation finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::adapters::{ScriptedProvider, ScriptedReply};
    use serde_json::json;

    fn service(replies: Vec<ScriptedReply>) -> AiService<ScriptedProvider> {
        AiService::new(ScriptedProvider::new(replies), "gpt-4o", "gpt-4o-mini").unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_skips_provider() {
        let service = service(vec![ScriptedReply::Empty]);
        let err = service
            .generate_functional_blocks(&ProjectContext::new("", "Tutor app"))
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
        assert!(service.provider().calls().is_empty());
    }

    #[tokio::test]
    async fn test_conformant_response_returned() {
        let payload = json!({"blocks": [{
            "id": "auth",
            "name": "Authentication",
            "description": "Sign-in",
            "category": "infrastructure",
            "dependencies": [],
            "order": 1
        }]});
        let service = service(vec![ScriptedReply::json(&payload)]);
        let blocks = service
            .generate_functional_blocks(&ProjectContext::new("p1", "Tutor app"))
            .await
            .unwrap();
        assert_eq!(serde_json::to_value(blocks).unwrap(), payload);
        assert_eq!(service.provider().models(), vec!["gpt-4o"]);
    }

    #[tokio::test]
    async fn test_schema_violation_degrades() {
        let service = service(vec![ScriptedReply::json(&json!({"blocks": "none"}))]);
        let project = ProjectContext::new("p1", "Tutor app");
        let blocks = service.generate_functional_blocks(&project).await.unwrap();
        assert_eq!(blocks, crate::catalog::functional_blocks::fallback(&project));
        assert_eq!(service.provider().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_authentication_failure_degrades() {
        let service = service(vec![ScriptedReply::AuthenticationFailed]);
        let input = ToolCompletionInput {
            messages: vec![crate::llm::Message::user("hi")],
            tools: Vec::new(),
        };
        let reply = service.complete_with_tools(&input).await.unwrap();
        assert_eq!(reply, crate::catalog::tool_calling::fallback());
    }

    #[test]
    fn test_clone_shares_catalog() {
        let a = service(Vec::new());
        let b = a.clone();
        assert!(Arc::ptr_eq(&a.catalog, &b.catalog));
        assert_eq!(b.default_model(), "gpt-4o");
    }
}
