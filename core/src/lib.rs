//! Planforge Core Module
//!
//! AI completion orchestration for the planning application: provider
//! adapters, structured completions checked against response contracts,
//! rate-limit retries with model fallback, and graceful degradation to
//! deterministic fallback payloads.

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod contract;
pub mod engine;
pub mod error;
pub mod llm;
pub mod retry;
pub mod service;

pub use crate::catalog::{
    AssumptionFeedback, AssumptionValidation, Assumptions, BlockCategory, FunctionalBlock,
    FunctionalBlocks, OperationCatalog, ProjectContext, ProjectSchedule, ProjectSuggestion,
    ProjectSuggestions, ScheduleInput, ScheduleStage, Severity, SuggestionInput, SuggestionKind,
    ToolCompletion, ToolCompletionInput,
};
pub use crate::classifier::{ClassifiedError, DegradationPolicy};
pub use crate::config::{AiConfig, AppConfig, ConfigError, ExecutionContext};
pub use crate::contract::{ContractError, JsonSchemaContract, ResponseContract, Violation};
pub use crate::engine::{StructuredCompletionEngine, ToolCallOutput};
pub use crate::error::{AiError, ErrorCode, InputError, MalformedOutput};
pub use crate::llm::{Message, Role, SamplingParams, ToolDefinition, ToolInvocation};
pub use crate::retry::{RetryController, RetryPolicy};
pub use crate::service::{AiService, SetupError};
