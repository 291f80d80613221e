//! API Handlers Module
//!
//! One handler per AI operation. Handlers only parse, delegate and render;
//! retries and fallbacks happen inside the service.

use std::sync::Arc;

use axum::{debug_handler, extract::rejection::JsonRejection, extract::State, response::Json};

use planforge_core::llm::adapters::Provider;
use planforge_core::{
    AiService, AssumptionValidation, FunctionalBlocks, ProjectSchedule, ProjectSuggestions,
    ScheduleInput, SuggestionInput, ToolCompletion, ToolCompletionInput,
};

use crate::error::ApiError;
use crate::models::{FunctionalBlocksRequest, HealthResponse, ValidateAssumptionsRequest};

/// Shared state of the API server
pub struct ApiState<P> {
    pub ai: AiService<P>,
}

impl<P> ApiState<P> {
    pub fn new(ai: AiService<P>) -> Self {
        Self { ai }
    }
}

type SharedState<P> = State<Arc<ApiState<P>>>;

/// Health check endpoint
#[debug_handler]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "planforge-api".to_string(),
    })
}

/// `POST /api/ai/assumptions/validate`
pub async fn validate_assumptions<P: Provider + 'static>(
    State(state): SharedState<P>,
    payload: Result<Json<ValidateAssumptionsRequest>, JsonRejection>,
) -> Result<Json<AssumptionValidation>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(sections = request.assumptions.0.len(), "Validating assumptions");

    let result = state.ai.validate_assumptions(&request.assumptions).await?;
    Ok(Json(result))
}

/// `POST /api/ai/suggestions`
pub async fn project_suggestions<P: Provider + 'static>(
    State(state): SharedState<P>,
    payload: Result<Json<SuggestionInput>, JsonRejection>,
) -> Result<Json<ProjectSuggestions>, ApiError> {
    let Json(input) = payload?;
    tracing::debug!(project = %input.project.id, "Generating suggestions");

    let result = state.ai.generate_project_suggestions(&input).await?;
    Ok(Json(result))
}

/// `POST /api/ai/functional-blocks`
pub async fn functional_blocks<P: Provider + 'static>(
    State(state): SharedState<P>,
    payload: Result<Json<FunctionalBlocksRequest>, JsonRejection>,
) -> Result<Json<FunctionalBlocks>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(project = %request.project.id, "Generating functional blocks");

    let result = state.ai.generate_functional_blocks(&request.project).await?;
    Ok(Json(result))
}

/// `POST /api/ai/schedule`
pub async fn schedule<P: Provider + 'static>(
    State(state): SharedState<P>,
    payload: Result<Json<ScheduleInput>, JsonRejection>,
) -> Result<Json<ProjectSchedule>, ApiError> {
    let Json(input) = payload?;
    tracing::debug!(
        project = %input.project.id,
        blocks = input.blocks.len(),
        "Generating schedule"
    );

    let result = state.ai.generate_schedule(&input).await?;
    Ok(Json(result))
}

/// `POST /api/ai/chat`
pub async fn chat<P: Provider + 'static>(
    State(state): SharedState<P>,
    payload: Result<Json<ToolCompletionInput>, JsonRejection>,
) -> Result<Json<ToolCompletion>, ApiError> {
    let Json(input) = payload?;
    tracing::debug!(
        messages = input.messages.len(),
        tools = input.tools.len(),
        "Completing chat turn"
    );

    let result = state.ai.complete_with_tools(&input).await?;
    Ok(Json(result))
}
