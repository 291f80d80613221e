//! OpenAI response parsing
//!
//! Public functions for parsing OpenAI chat completion envelopes.

use serde::Deserialize;

use crate::llm::adapters::{AdapterError, ProviderResponse, RawToolCall};

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: Option<String>,
}

/// Parse OpenAI chat completion JSON response
///
/// Only the first choice is used. A missing message is an invalid response;
/// empty content is not (the engine decides what an empty answer means).
/// Explicit `null` lists and arguments read as empty, as some
/// OpenAI-compatible servers send them.
pub fn parse_chat_completion(response: &str) -> Result<ProviderResponse, AdapterError> {
    let completion: ChatCompletion = serde_json::from_str(response)
        .map_err(|e| AdapterError::InvalidResponse(format!("chat completion envelope: {}", e)))?;

    let message = completion
        .choices
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| AdapterError::InvalidResponse("Missing choices[0].message".to_string()))?;

    Ok(ProviderResponse {
        content: message.content,
        tool_calls: message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| RawToolCall {
                id: call.id,
                name: call.function.name,
                arguments: call.function.arguments.unwrap_or_default(),
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_completion_valid() {
        let json = r#"{"choices":[{"message":{"role":"assistant","content":"test content"}}]}"#;
        let result = parse_chat_completion(json).unwrap();
        assert_eq!(result.content.as_deref(), Some("test content"));
        assert!(result.tool_calls.is_empty());
    }

    #[test]
    fn test_parse_chat_completion_missing_choices() {
        let json = r#"{"model":"gpt-4"}"#;
        let result = parse_chat_completion(json);
        assert!(matches!(result, Err(AdapterError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_chat_completion_not_json() {
        let result = parse_chat_completion("<html>bad gateway</html>");
        assert!(matches!(result, Err(AdapterError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_tool_calls() {
        let json = r#"{"choices":[{"message":{"content":null,"tool_calls":[
            {"id":"call_1","type":"function","function":{"name":"create_task","arguments":"{\"title\":\"Write docs\"}"}}
        ]}}]}"#;
        let result = parse_chat_completion(json).unwrap();
        assert_eq!(result.content, None);
        assert_eq!(
            result.tool_calls,
            vec![RawToolCall {
                id: "call_1".to_string(),
                name: "create_task".to_string(),
                arguments: r#"{"title":"Write docs"}"#.to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_null_tool_calls() {
        let json = r#"{"choices":[{"message":{"content":"x","tool_calls":null}}]}"#;
        let result = parse_chat_completion(json).unwrap();
        assert_eq!(result.content.as_deref(), Some("x"));
        assert!(result.tool_calls.is_empty());
    }

    #[test]
    fn test_parse_null_arguments() {
        let json = r#"{"choices":[{"message":{"content":null,"tool_calls":[
            {"id":"call_2","type":"function","function":{"name":"list_tasks","arguments":null}}
        ]}}]}"#;
        let result = parse_chat_completion(json).unwrap();
        assert_eq!(result.tool_calls[0].name, "list_tasks");
        assert_eq!(result.tool_calls[0].arguments, "");
    }

    #[test]
    fn test_parse_null_choices_is_invalid() {
        let result = parse_chat_completion(r#"{"choices":null}"#);
        assert!(matches!(result, Err(AdapterError::InvalidResponse(_))));
    }
}
