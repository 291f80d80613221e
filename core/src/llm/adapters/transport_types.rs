//! Transport types
//!
//! Common types shared across transport implementations.

use async_trait::async_trait;

/// Adapter errors
///
/// Surfaced unmodified by adapters; classification happens in the engine.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// Network error (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP error (non-2xx status)
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limited; `retry_after` is the raw `Retry-After` header value
    #[error("Rate limited{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<String> },

    /// Invalid response from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Credentialed call attempted outside the server context
    #[error("Operation is only available in the server execution context")]
    ServerOnlyOperation,

    /// JSON error
    #[error("JSON error: {0}")]
    Json(String),
}

/// Display suffix for a provider `Retry-After` value
pub(crate) fn retry_hint(retry_after: &Option<String>) -> String {
    match retry_after {
        Some(value) => format!(" (retry after {}s)", value),
        None => String::new(),
    }
}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        AdapterError::Json(err.to_string())
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AdapterError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => AdapterError::Network(err.to_string()),
        }
    }
}

/// Asynchronous HTTP transport
///
/// Abstraction over the HTTP client to enable testing with `FakeTransport`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST a JSON body and return the response body
    ///
    /// Non-2xx statuses are returned as errors.
    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, AdapterError>;
}
