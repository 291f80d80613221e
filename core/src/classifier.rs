//! Error Classifier & Degradation Policy
//!
//! The single place where a failed operation is turned into its fallback
//! payload. Caller errors pass through; everything else is logged with a
//! short diagnostic id and replaced.

use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::error::{AiError, ErrorCode};

/// A failure tagged for logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedError {
    /// Short random id correlating log lines with a degraded response
    pub diagnostic_id: String,
    pub code: ErrorCode,
    pub operation: String,
    pub message: String,
}

impl ClassifiedError {
    pub fn classify(operation: &str, err: &AiError) -> Self {
        Self {
            diagnostic_id: diagnostic_id(),
            code: err.code(),
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}

/// 8 hex characters
fn diagnostic_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}

/// Converts unrecoverable failures into fallback payloads
#[derive(Debug, Clone, Copy, Default)]
pub struct DegradationPolicy;

impl DegradationPolicy {
    /// Resolve an operation outcome
    ///
    /// Returns `Err` only for caller errors (`InvalidInput`,
    /// `ServerOnlyOperation`).
    pub fn resolve<T, F>(
        &self,
        operation: &str,
        outcome: Result<T, AiError>,
        fallback: F,
    ) -> Result<T, AiError>
    where
        F: FnOnce() -> T,
    {
        match outcome {
            Ok(value) => Ok(value),
            Err(err) if err.is_caller_error() => Err(err),
            Err(err) => {
                let classified = ClassifiedError::classify(operation, &err);
                error!(
                    diagnostic_id = %classified.diagnostic_id,
                    code = %classified.code,
                    operation = %classified.operation,
                    error = %classified.message,
                    "operation degraded to fallback"
                );
                Ok(fallback())
            }
        }
    }
}
