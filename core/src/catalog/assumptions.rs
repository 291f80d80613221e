//! Assumption validation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::project::Assumptions;
use crate::catalog::OperationDescriptor;
use crate::contract::ContractError;
use crate::error::AiError;
use crate::llm::request::SamplingParams;

/// Feedback severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Feedback on one assumption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionFeedback {
    /// Dotted path of the assumption (e.g. `marketAssumptions.marketSize`)
    pub field: String,
    pub message: String,
    pub severity: Severity,
}

/// Result of validating a set of assumptions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssumptionValidation {
    pub is_valid: bool,
    pub feedback: Vec<AssumptionFeedback>,
    pub suggestions: Vec<String>,
}

fn system_prompt() -> String {
    "You are an experienced software project planner reviewing the assumptions behind a \
     new project. Check market, technical, business and resource assumptions for gaps, \
     contradictions and unrealistic expectations. Report each finding against the dotted \
     path of the assumption it concerns, with severity info, warning or error. Set isValid \
     to false only when at least one finding has severity error. Add concrete suggestions \
     for assumptions the team has not considered yet."
        .to_string()
}

fn user_prompt(assumptions: &Assumptions) -> String {
    format!(
        "Validate these project assumptions:\n{}",
        assumptions.to_prompt_text()
    )
}

fn validate_input(assumptions: &Assumptions) -> Result<(), AiError> {
    assumptions.validate("assumptions")
}

/// Validation is skipped, not failed: the user can continue
pub fn fallback(_: &Assumptions) -> AssumptionValidation {
    AssumptionValidation {
        is_valid: true,
        feedback: vec![AssumptionFeedback {
            field: "general".to_string(),
            message: "Automated assumption review is temporarily unavailable. Your assumptions \
                      were kept as entered; try the review again later."
                .to_string(),
            severity: Severity::Info,
        }],
        suggestions: Vec::new(),
    }
}

pub fn descriptor(
) -> Result<OperationDescriptor<Assumptions, AssumptionValidation>, ContractError> {
    OperationDescriptor::new(
        "validate_assumptions",
        system_prompt,
        user_prompt,
        validate_input,
        fallback,
        SamplingParams::with_temperature(0.3).max_tokens(1500),
    )
}
