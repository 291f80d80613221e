//! Operation Catalog
//!
//! Every planning operation is described once: prompts, input validation,
//! response contract, sampling parameters and the fallback served when the
//! model cannot produce a conformant answer.

pub mod assumptions;
pub mod functional_blocks;
pub mod project;
pub mod schedule;
pub mod suggestions;
pub mod tool_calling;

use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::contract::{ContractError, JsonSchemaContract};
use crate::error::AiError;
use crate::llm::message::Message;
use crate::llm::request::{CompletionRequest, SamplingParams};

pub use assumptions::{AssumptionFeedback, AssumptionValidation, Severity};
pub use functional_blocks::{BlockCategory, FunctionalBlock, FunctionalBlocks};
pub use project::{Assumptions, ProjectContext};
pub use schedule::{ProjectSchedule, ScheduleInput, ScheduleStage};
pub use suggestions::{ProjectSuggestion, ProjectSuggestions, SuggestionInput, SuggestionKind};
pub use tool_calling::{ToolCallingDescriptor, ToolCompletion, ToolCompletionInput};

/// Structured operation taking `I` and producing `O`
pub struct OperationDescriptor<I, O> {
    pub name: &'static str,
    pub system_prompt: fn() -> String,
    pub user_prompt: fn(&I) -> String,
    pub validate_input: fn(&I) -> Result<(), AiError>,
    /// Deterministic for a given input
    pub fallback: fn(&I) -> O,
    pub sampling: SamplingParams,
    pub contract: Arc<JsonSchemaContract<O>>,
}

impl<I, O> std::fmt::Debug for OperationDescriptor<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationDescriptor")
            .field("name", &self.name)
            .field("sampling", &self.sampling)
            .finish_non_exhaustive()
    }
}

impl<I, O> OperationDescriptor<I, O>
where
    O: JsonSchema + DeserializeOwned,
{
    pub fn new(
        name: &'static str,
        system_prompt: fn() -> String,
        user_prompt: fn(&I) -> String,
        validate_input: fn(&I) -> Result<(), AiError>,
        fallback: fn(&I) -> O,
        sampling: SamplingParams,
    ) -> Result<Self, ContractError> {
        Ok(Self {
            name,
            system_prompt,
            user_prompt,
            validate_input,
            fallback,
            sampling,
            contract: Arc::new(JsonSchemaContract::new(name)?),
        })
    }

    /// System and user messages; the system prompt carries the response schema
    pub fn messages(&self, input: &I) -> Vec<Message> {
        let system = format!(
            "{}\n\nRespond with a single JSON object and nothing else. \
             It must conform to this JSON Schema:\n{}",
            (self.system_prompt)(),
            self.contract.schema_text()
        );
        vec![Message::system(system), Message::user((self.user_prompt)(input))]
    }

    /// Request for one attempt against `model`
    pub fn request(
        &self,
        model: &str,
        messages: Vec<Message>,
    ) -> CompletionRequest<JsonSchemaContract<O>> {
        CompletionRequest::new(model, messages, Arc::clone(&self.contract))
            .with_sampling(self.sampling)
    }
}

/// All operations the service exposes
#[derive(Debug)]
pub struct OperationCatalog {
    pub validate_assumptions: OperationDescriptor<Assumptions, AssumptionValidation>,
    pub project_suggestions: OperationDescriptor<SuggestionInput, ProjectSuggestions>,
    pub functional_blocks: OperationDescriptor<ProjectContext, FunctionalBlocks>,
    pub schedule: OperationDescriptor<ScheduleInput, ProjectSchedule>,
    pub tool_calling: ToolCallingDescriptor,
}

impl OperationCatalog {
    /// Build every descriptor and compile its contract
    pub fn new() -> Result<Self, ContractError> {
        Ok(Self {
            validate_assumptions: assumptions::descriptor()?,
            project_suggestions: suggestions::descriptor()?,
            functional_blocks: functional_blocks::descriptor()?,
            schedule: schedule::descriptor()?,
            tool_calling: tool_calling::descriptor(),
        })
    }
}
