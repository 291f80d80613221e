//! Schedule generation

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::functional_blocks::FunctionalBlock;
use crate::catalog::project::{require_text, ProjectContext};
use crate::catalog::OperationDescriptor;
use crate::contract::ContractError;
use crate::error::AiError;
use crate::llm::request::SamplingParams;

/// One stage of the delivery plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStage {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Ids of stages that must finish first
    pub dependencies: Vec<String>,
    /// Ids of the functional blocks delivered in this stage
    pub related_blocks: Vec<String>,
    #[schemars(range(min = 1))]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSchedule {
    pub stages: Vec<ScheduleStage>,
}

/// Project and the blocks to schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInput {
    pub project: ProjectContext,
    pub blocks: Vec<FunctionalBlock>,
}

fn system_prompt() -> String {
    "You are a delivery manager planning a software project. Group the functional blocks \
     given by the user into ordered stages. Each stage lists the ids of the blocks it \
     delivers in relatedBlocks and the ids of earlier stages it depends on. Orders are \
     1-based and a stage never depends on a stage with a higher order."
        .to_string()
}

fn user_prompt(input: &ScheduleInput) -> String {
    let blocks = serde_json::to_string_pretty(&input.blocks).unwrap_or_default();
    format!(
        "Create a delivery schedule for this project.\n\n{}\nFunctional blocks:\n{}",
        input.project.to_prompt_text(),
        blocks
    )
}

fn validate_input(input: &ScheduleInput) -> Result<(), AiError> {
    input.project.validate("project")?;
    if input.blocks.is_empty() {
        return Err(AiError::invalid_input(
            "blocks",
            "at least one functional block is required",
        ));
    }
    for (i, block) in input.blocks.iter().enumerate() {
        require_text(&format!("blocks[{}].id", i), &block.id)?;
    }
    Ok(())
}

/// Single planning stage covering every block
pub fn fallback(input: &ScheduleInput) -> ProjectSchedule {
    ProjectSchedule {
        stages: vec![ScheduleStage {
            id: "project-planning".to_string(),
            name: "Project Planning".to_string(),
            description: "Automated scheduling is temporarily unavailable. Plan the stages \
                          for these blocks manually or try again later."
                .to_string(),
            dependencies: Vec::new(),
            related_blocks: input.blocks.iter().map(|b| b.id.clone()).collect(),
            order: 1,
        }],
    }
}

pub fn descriptor() -> Result<OperationDescriptor<ScheduleInput, ProjectSchedule>, ContractError> {
    OperationDescriptor::new(
        "generate_schedule",
        system_prompt,
        user_prompt,
        validate_input,
        fallback,
        SamplingParams::with_temperature(0.4).max_tokens(2500),
    )
}
