//! Adapter Factory
//!
//! Creates the LLM provider from configuration.

use crate::config::AiConfig;
use crate::llm::adapters::openai::OpenAiAdapter;
use crate::llm::adapters::transport::{ReqwestTransport, Transport};
use crate::llm::adapters::AdapterError;

/// Create the provider described by `config`
pub fn create_provider(config: &AiConfig) -> Result<OpenAiAdapter, AdapterError> {
    match config.provider.as_str() {
        "openai" => {}
        other => {
            return Err(AdapterError::Configuration(format!(
                "Unknown provider: {}",
                other
            )))
        }
    }

    let api_key = match config.api_key.as_deref() {
        Some(value) => resolve_env_var(value)?,
        None => String::new(),
    };
    let transport = ReqwestTransport::with_timeout(config.request_timeout_seconds)?;

    Ok(
        OpenAiAdapter::with_transport(config.base_url.clone(), api_key, Transport::Real(transport))
            .in_context(config.execution_context),
    )
}

/// Resolve environment variable reference
///
/// If value starts with "env:", read from environment; an unset or empty
/// variable is a configuration error. Otherwise return value as-is.
fn resolve_env_var(value: &str) -> Result<String, AdapterError> {
    let Some(name) = value.strip_prefix("env:") else {
        return Ok(value.to_string());
    };
    match std::env::var(name) {
        Ok(resolved) if !resolved.trim().is_empty() => Ok(resolved),
        _ => Err(AdapterError::Configuration(format!(
            "api_key references unset environment variable {}",
            name
        ))),
    }
}
