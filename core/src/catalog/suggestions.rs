//! Project suggestions

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::project::ProjectContext;
use crate::catalog::OperationDescriptor;
use crate::contract::ContractError;
use crate::error::AiError;
use crate::llm::request::SamplingParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Feature,
    Improvement,
    Risk,
    Technology,
    Process,
    General,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSuggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub content: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSuggestions {
    pub suggestions: Vec<ProjectSuggestion>,
}

/// Project plus an optional area to concentrate on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionInput {
    pub project: ProjectContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_area: Option<String>,
}

fn system_prompt() -> String {
    "You are a senior product and engineering advisor. Suggest concrete, actionable \
     improvements for the project described by the user. Classify each suggestion as \
     feature, improvement, risk, technology, process or general, give it a short unique \
     id, and explain in one or two sentences why it matters for this project."
        .to_string()
}

fn user_prompt(input: &SuggestionInput) -> String {
    let mut prompt = format!(
        "Suggest improvements for this project.\n\n{}",
        input.project.to_prompt_text()
    );
    if let Some(focus) = input.focus_area.as_deref().filter(|f| !f.trim().is_empty()) {
        prompt.push_str(&format!("\nConcentrate on: {}\n", focus));
    }
    prompt
}

fn validate_input(input: &SuggestionInput) -> Result<(), AiError> {
    input.project.validate("project")
}

/// One generic suggestion; only the id varies between calls
pub fn fallback(input: &SuggestionInput) -> ProjectSuggestions {
    ProjectSuggestions {
        suggestions: vec![ProjectSuggestion {
            id: Uuid::new_v4().to_string(),
            kind: SuggestionKind::General,
            content: format!(
                "Review the scope of {} and break it into small, testable milestones.",
                input.project.name
            ),
            reason: "Automated suggestions are temporarily unavailable. A scope review is \
                     a useful next step for any project."
                .to_string(),
        }],
    }
}

pub fn descriptor(
) -> Result<OperationDescriptor<SuggestionInput, ProjectSuggestions>, ContractError> {
    OperationDescriptor::new(
        "generate_project_suggestions",
        system_prompt,
        user_prompt,
        validate_input,
        fallback,
        SamplingParams::with_temperature(0.7).max_tokens(1500),
    )
}
