//! AI orchestration errors
//!
//! Every failure a generation operation can hit, as a value. The retry
//! controller branches on these; the degradation policy classifies them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contract::Violation;
use crate::llm::adapters::transport_types::retry_hint;
use crate::llm::adapters::AdapterError;

/// Caller input rejected before any request was built
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Why provider output could not be read
#[derive(Debug, thiserror::Error)]
pub enum MalformedOutput {
    #[error("provider returned no content")]
    Empty,

    #[error("content is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected response envelope: {0}")]
    Envelope(String),
}

/// Orchestration errors
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Invalid input: {0}")]
    InvalidInput(InputError),

    #[error("Operation is only available on the server")]
    ServerOnlyOperation,

    #[error("Rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<String> },

    #[error("Malformed model output: {0}")]
    MalformedOutput(#[from] MalformedOutput),

    #[error("Response violates contract '{contract}': {}", summarize(.violations))]
    SchemaViolation {
        contract: String,
        violations: Vec<Violation>,
    },

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl AiError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        AiError::InvalidInput(InputError {
            field: field.into(),
            message: message.into(),
        })
    }

    /// Stable code reported to callers and logs
    pub fn code(&self) -> ErrorCode {
        match self {
            AiError::InvalidInput(_) => ErrorCode::InvalidInput,
            AiError::ServerOnlyOperation => ErrorCode::ServerOnlyOperation,
            AiError::RateLimited { .. } => ErrorCode::RateLimitExceeded,
            AiError::MalformedOutput(_) => ErrorCode::JsonParseError,
            AiError::SchemaViolation { .. } => ErrorCode::SchemaValidationError,
            AiError::ProviderUnavailable(_) => ErrorCode::UnknownError,
        }
    }

    /// Caller/programmer errors that must reach the caller unchanged
    pub fn is_caller_error(&self) -> bool {
        matches!(self, AiError::InvalidInput(_) | AiError::ServerOnlyOperation)
    }

    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, AiError::RateLimited { .. })
    }
}

impl From<AdapterError> for AiError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::RateLimited { retry_after } => AiError::RateLimited { retry_after },
            AdapterError::ServerOnlyOperation => AiError::ServerOnlyOperation,
            AdapterError::InvalidResponse(msg) | AdapterError::Json(msg) => {
                AiError::MalformedOutput(MalformedOutput::Envelope(msg))
            }
            other => AiError::ProviderUnavailable(other.to_string()),
        }
    }
}

/// Error codes exposed at the service boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ServerOnlyOperation,
    InvalidInput,
    SchemaValidationError,
    JsonParseError,
    RateLimitExceeded,
    UnknownError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ServerOnlyOperation => "SERVER_ONLY_OPERATION",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::SchemaValidationError => "SCHEMA_VALIDATION_ERROR",
            ErrorCode::JsonParseError => "JSON_PARSE_ERROR",
            ErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ErrorCode::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_error_mapping() {
        let err: AiError = AdapterError::RateLimited {
            retry_after: Some("5".to_string()),
        }
        .into();
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Rate limit exceeded (retry after 5s)");
        assert_eq!(err.code(), ErrorCode::RateLimitExceeded);

        let err: AiError = AdapterError::ServerOnlyOperation.into();
        assert!(err.is_caller_error());

        let err: AiError = AdapterError::InvalidResponse("no choices".to_string()).into();
        assert_eq!(err.code(), ErrorCode::JsonParseError);

        let err: AiError = AdapterError::Authentication("bad key".to_string()).into();
        assert!(matches!(err, AiError::ProviderUnavailable(_)));
        assert_eq!(err.code(), ErrorCode::UnknownError);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_code_serialization_matches_as_str() {
        for code in [
            ErrorCode::ServerOnlyOperation,
            ErrorCode::InvalidInput,
            ErrorCode::SchemaValidationError,
            ErrorCode::JsonParseError,
            ErrorCode::RateLimitExceeded,
            ErrorCode::UnknownError,
        ] {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, code.as_str());
        }
    }

    #[test]
    fn test_schema_violation_display_lists_paths() {
        let err = AiError::SchemaViolation {
            contract: "functional_blocks".to_string(),
            violations: vec![Violation {
                path: "/blocks/0/order".to_string(),
                message: "\"one\" is not of type \"integer\"".to_string(),
            }],
        };
        let text = err.to_string();
        assert!(text.contains("functional_blocks"));
        assert!(text.contains("/blocks/0/order"));
    }
}
