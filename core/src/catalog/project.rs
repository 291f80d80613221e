//! Project context shared by the planning operations

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::AiError;

/// Free-form project assumptions, grouped by area
/// (e.g. `{"marketAssumptions": {"targetAudience": "students"}}`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assumptions(pub Map<String, JsonValue>);

impl Assumptions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self, field: &str) -> Result<(), AiError> {
        if self.is_empty() {
            return Err(AiError::invalid_input(
                field,
                "at least one assumption must be provided",
            ));
        }
        Ok(())
    }

    /// Pretty JSON for prompts
    pub fn to_prompt_text(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }
}

impl From<Map<String, JsonValue>> for Assumptions {
    fn from(map: Map<String, JsonValue>) -> Self {
        Assumptions(map)
    }
}

/// Project the operation is about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContext {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<Assumptions>,
}

impl ProjectContext {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            assumptions: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_assumptions(mut self, assumptions: Assumptions) -> Self {
        self.assumptions = Some(assumptions);
        self
    }

    /// Identifier and name must be present
    pub fn validate(&self, prefix: &str) -> Result<(), AiError> {
        require_text(&format!("{}.id", prefix), &self.id)?;
        require_text(&format!("{}.name", prefix), &self.name)
    }

    /// Project summary block for prompts
    pub fn to_prompt_text(&self) -> String {
        let mut text = format!("Project: {}\n", self.name);
        if let Some(description) = self.description.as_deref().filter(|d| !d.trim().is_empty()) {
            text.push_str(&format!("Description: {}\n", description));
        }
        if let Some(assumptions) = self.assumptions.as_ref().filter(|a| !a.is_empty()) {
            text.push_str(&format!("Assumptions:\n{}\n", assumptions.to_prompt_text()));
        }
        text
    }
}

/// Reject empty or whitespace-only text
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), AiError> {
    if value.trim().is_empty() {
        return Err(AiError::invalid_input(field, "must not be empty"));
    }
    Ok(())
}
