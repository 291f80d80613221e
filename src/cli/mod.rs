//! CLI module
//!
//! Provides:
//! - Argument parsing (clap)
//! - Configuration loading and validation
//! - Logging initialisation
//! - Mode dispatch (serve, check-config)

pub mod args;
pub mod dispatch;
pub mod logging;

// Re-exports
pub use args::{Args, Mode};
pub use dispatch::{check_config, run_cli_mode};
pub use logging::init_tracing;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] planforge_core::ConfigError),

    #[error("Service setup error: {0}")]
    Setup(#[from] planforge_core::SetupError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(anyhow::Error),
}

/// Exit codes (deterministic)
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, Error>;
