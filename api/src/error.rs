//! API errors
//!
//! Input failures render as 400 with details; anything the service
//! propagates otherwise renders as 500.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use planforge_core::{AiError, ErrorCode};

use crate::models::{ErrorBody, ErrorDetail};

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(
        status: StatusCode,
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    ) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: ErrorDetail {
                    code: code.as_str().to_string(),
                    message,
                    details,
                },
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        match &err {
            AiError::InvalidInput(input) => Self::new(
                StatusCode::BAD_REQUEST,
                err.code(),
                err.to_string(),
                Some(json!({"field": input.field})),
            ),
            _ => {
                warn!(code = %err.code(), error = %err, "request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.code(), err.to_string(), None)
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidInput,
            "Request body is not valid JSON for this operation".to_string(),
            Some(json!({"reason": rejection.body_text()})),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_is_bad_request() {
        let err = ApiError::from(AiError::invalid_input("project.name", "must not be empty"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().error.code, "INVALID_INPUT");
        assert_eq!(err.body().error.details, Some(json!({"field": "project.name"})));
    }

    #[test]
    fn test_server_only_is_internal_error() {
        let err = ApiError::from(AiError::ServerOnlyOperation);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().error.code, "SERVER_ONLY_OPERATION");
        assert!(err.body().error.details.is_none());
    }
}
