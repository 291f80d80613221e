//! API Models Module
//!
//! Request and response bodies that are not core domain types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use planforge_core::config::ServerConfig;
use planforge_core::{Assumptions, ProjectContext};

/// Listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for ApiConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
        }
    }
}

impl ApiConfig {
    /// `host:port` for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Body of `POST /api/ai/assumptions/validate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateAssumptionsRequest {
    pub assumptions: Assumptions,
}

/// Body of `POST /api/ai/functional-blocks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionalBlocksRequest {
    pub project: ProjectContext,
}

/// Response of `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Error envelope: `{"error": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}
