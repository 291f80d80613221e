//! Configuration Management Module
//!
//! Layered configuration: built-in defaults, an optional TOML file, then
//! `PLANFORGE__`-prefixed environment variables (`PLANFORGE__AI__API_KEY`).
//! Read once at start-up; nothing here is consulted per call.

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use crate::llm::adapters::ExecutionContext;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PLANFORGE";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// LLM provider settings consumed by the AI service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Provider name (only "openai" is supported)
    pub provider: String,
    pub base_url: String,
    /// Provider credential; `env:NAME` reads it from the environment
    pub api_key: Option<String>,
    pub default_model: String,
    /// Model substituted on the final retry
    pub fallback_model: String,
    pub request_timeout_seconds: u64,
    pub execution_context: ExecutionContext,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            default_model: "gpt-4o".to_string(),
            fallback_model: "gpt-4o-mini".to_string(),
            request_timeout_seconds: 60,
            execution_context: ExecutionContext::Server,
        }
    }
}

impl AiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_model.trim().is_empty() {
            return Err(ConfigError::Invalid("ai.default_model is empty".to_string()));
        }
        if self.fallback_model.trim().is_empty() {
            return Err(ConfigError::Invalid("ai.fallback_model is empty".to_string()));
        }
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "ai.request_timeout_seconds must be positive".to_string(),
            ));
        }
        let has_key = self
            .api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false);
        if self.execution_context == ExecutionContext::Server && !has_key {
            return Err(ConfigError::Invalid(
                "ai.api_key is required in the server execution context".to_string(),
            ));
        }
        Ok(())
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from defaults, `path` (if any) and `PLANFORGE__*` variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load using a custom environment prefix
    pub fn load_with_prefix(path: Option<&Path>, env_prefix: &str) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                ::config::Environment::with_prefix(env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.ai.validate()?;
        Ok(config)
    }

    /// Copy safe to print: the API key is masked
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.ai.api_key.is_some() {
            copy.ai.api_key = Some("***".to_string());
        }
        copy
    }
}
