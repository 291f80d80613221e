//! Tool-assisted chat

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::AiError;
use crate::llm::message::{validate_messages, Message, Role};
use crate::llm::request::{SamplingParams, ToolDefinition, ToolInvocation, ToolRequest};

/// Conversation plus the tools the model may call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCompletionInput {
    pub messages: Vec<Message>,
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

/// Assistant reply and requested tool invocations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCompletion {
    pub message: String,
    pub tool_calls: Vec<ToolInvocation>,
}

/// Free-form operation; there is no contract, output is checked by the engine
#[derive(Debug, Clone)]
pub struct ToolCallingDescriptor {
    pub name: &'static str,
    pub system_prompt: fn() -> String,
    pub fallback: fn() -> ToolCompletion,
    pub sampling: SamplingParams,
}

impl ToolCallingDescriptor {
    pub fn validate_input(&self, input: &ToolCompletionInput) -> Result<(), AiError> {
        validate_messages(&input.messages)?;
        let mut seen = HashSet::new();
        for (i, tool) in input.tools.iter().enumerate() {
            if tool.name.trim().is_empty() {
                return Err(AiError::invalid_input(
                    format!("tools[{}].name", i),
                    "must not be empty",
                ));
            }
            if !seen.insert(tool.name.as_str()) {
                return Err(AiError::invalid_input(
                    format!("tools[{}].name", i),
                    format!("duplicate tool name '{}'", tool.name),
                ));
            }
        }
        Ok(())
    }

    /// Conversation with the assistant system prompt in front, unless the
    /// caller supplied its own
    pub fn messages(&self, input: &ToolCompletionInput) -> Vec<Message> {
        let caller_system = input
            .messages
            .first()
            .is_some_and(|m| m.role == Role::System);
        if caller_system {
            return input.messages.clone();
        }

        let mut messages = Vec::with_capacity(input.messages.len() + 1);
        messages.push(Message::system((self.system_prompt)()));
        messages.extend(input.messages.iter().cloned());
        messages
    }

    pub fn request(&self, model: &str, input: &ToolCompletionInput) -> ToolRequest {
        ToolRequest {
            model: model.to_string(),
            messages: self.messages(input),
            tools: input.tools.clone(),
            sampling: self.sampling,
        }
    }
}

fn system_prompt() -> String {
    "You are the planning assistant of a project management application. Answer the \
     user's questions about their project. When an available tool can perform the \
     requested change, call it instead of describing the change."
        .to_string()
}

/// Apology without tool calls
pub fn fallback() -> ToolCompletion {
    ToolCompletion {
        message: "Sorry, I can't process that request right now. Please try again in a moment."
            .to_string(),
        tool_calls: Vec::new(),
    }
}

pub fn descriptor() -> ToolCallingDescriptor {
    ToolCallingDescriptor {
        name: "complete_with_tools",
        system_prompt,
        fallback,
        sampling: SamplingParams::with_temperature(0.7).max_tokens(1000),
    }
}
