//! Functional block breakdown

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::catalog::project::ProjectContext;
use crate::catalog::OperationDescriptor;
use crate::contract::ContractError;
use crate::error::AiError;
use crate::llm::request::SamplingParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BlockCategory {
    Core,
    Supporting,
    Integration,
    Infrastructure,
    Interface,
}

/// A coherent unit of functionality
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalBlock {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: BlockCategory,
    /// Ids of blocks this one builds on
    pub dependencies: Vec<String>,
    /// 1-based implementation order
    #[schemars(range(min = 1))]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunctionalBlocks {
    pub blocks: Vec<FunctionalBlock>,
}

fn system_prompt() -> String {
    "You are a software architect. Break the project described by the user into \
     functional blocks: coherent units of functionality that can be designed and built \
     separately. Give every block a short unique id, a category (core, supporting, \
     integration, infrastructure or interface), the ids of the blocks it depends on, and \
     a 1-based implementation order that respects those dependencies."
        .to_string()
}

fn user_prompt(project: &ProjectContext) -> String {
    format!(
        "Identify the functional blocks of this project.\n\n{}",
        project.to_prompt_text()
    )
}

fn validate_input(project: &ProjectContext) -> Result<(), AiError> {
    project.validate("project")
}

/// Single core block covering the whole project
pub fn fallback(project: &ProjectContext) -> FunctionalBlocks {
    FunctionalBlocks {
        blocks: vec![FunctionalBlock {
            id: "core-functionality".to_string(),
            name: "Core Functionality".to_string(),
            description: format!(
                "The main features of {}. Automated breakdown is temporarily unavailable; \
                 split this block manually or try again later.",
                project.name
            ),
            category: BlockCategory::Core,
            dependencies: Vec::new(),
            order: 1,
        }],
    }
}

pub fn descriptor(
) -> Result<OperationDescriptor<ProjectContext, FunctionalBlocks>, ContractError> {
    OperationDescriptor::new(
        "generate_functional_blocks",
        system_prompt,
        user_prompt,
        validate_input,
        fallback,
        SamplingParams::with_temperature(0.5).max_tokens(2500),
    )
}
