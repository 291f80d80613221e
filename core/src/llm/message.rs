//! Conversation messages
//!
//! Provider-agnostic representation of one conversation turn. Order within a
//! conversation is meaningful and is preserved all the way to the wire.

use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sets behavior/context
    System,
    /// Human input
    User,
    /// Model output
    Assistant,
    /// Result of a named function call
    Function,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Function => "function",
        }
    }
}

/// Single conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// Required when `role` is [`Role::Function`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            name: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            name: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            name: None,
        }
    }

    /// Function result message; the name identifies the function that produced it
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Function,
            content: content.into(),
            name: Some(name.into()),
        }
    }
}

/// Reject conversations a provider cannot accept
///
/// An empty conversation, or a function message without a name, is a caller
/// error and never reaches the network.
pub fn validate_messages(messages: &[Message]) -> Result<(), AiError> {
    if messages.is_empty() {
        return Err(AiError::invalid_input(
            "messages",
            "conversation must contain at least one message",
        ));
    }

    for (index, message) in messages.iter().enumerate() {
        if message.role != Role::Function {
            continue;
        }
        let named = message
            .name
            .as_deref()
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false);
        if !named {
            return Err(AiError::invalid_input(
                format!("messages[{}].name", index),
                "function messages must carry the function name",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&Message::function("lookup", "{}")).unwrap();
        assert_eq!(json, r#"{"role":"function","content":"{}","name":"lookup"}"#);

        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert!(!json.contains("name"));
    }

    #[test]
    fn test_validate_messages_empty() {
        let err = validate_messages(&[]).unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
    }

    #[test]
    fn test_validate_messages_unnamed_function() {
        let messages = vec![
            Message::user("run it"),
            Message {
                role: Role::Function,
                content: "42".to_string(),
                name: Some("  ".to_string()),
            },
        ];
        match validate_messages(&messages).unwrap_err() {
            AiError::InvalidInput(input) => assert_eq!(input.field, "messages[1].name"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_messages_ok() {
        let messages = vec![
            Message::system("be brief"),
            Message::user("hello"),
            Message::assistant("hi"),
            Message::function("clock", "12:00"),
        ];
        assert!(validate_messages(&messages).is_ok());
    }
}
