//! Mode dispatch

use std::path::Path;

use tracing::{debug, info};

use planforge_api::{ApiConfig, ApiServer};
use planforge_core::{AiService, AppConfig};

use crate::cli::args::{Args, Mode};
use crate::cli::logging::init_tracing;
use crate::cli::{Error, Result, EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_SUCCESS};

/// Run the selected mode and return the process exit code
pub async fn run_cli_mode(args: Args) -> i32 {
    match run(args).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            match e {
                Error::Config(_) => EXIT_CONFIG_ERROR,
                _ => EXIT_FAILURE,
            }
        }
    }
}

async fn run(args: Args) -> Result<()> {
    match args.mode() {
        Mode::CheckConfig => {
            println!("{}", check_config(args.config.as_deref())?);
            Ok(())
        }
        Mode::Serve { host, port } => {
            let mut config = AppConfig::load(args.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.logging.json |= args.log_json;

            init_tracing(&config.logging.level, config.logging.json).map_err(Error::Server)?;
            debug!(path = ?args.config, "configuration loaded");
            serve(config).await
        }
    }
}

/// Validated configuration rendered as JSON with the API key masked
pub fn check_config(path: Option<&Path>) -> Result<String> {
    let config = AppConfig::load(path)?;
    Ok(serde_json::to_string_pretty(&config.redacted())?)
}

async fn serve(config: AppConfig) -> Result<()> {
    info!(
        host = %config.server.host,
        port = config.server.port,
        context = ?config.ai.execution_context,
        "Starting planforge"
    );

    let service = AiService::from_config(&config.ai)?;
    let server = ApiServer::new(ApiConfig::from(&config.server), service);
    server.start().await.map_err(Error::Server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_check_config_masks_key() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(
            br#"
[ai]
api_key = "sk-secret-value"
default_model = "gpt-4o"
"#,
        )
        .unwrap();

        let rendered = check_config(Some(file.path())).unwrap();
        assert!(rendered.contains("\"***\""));
        assert!(!rendered.contains("sk-secret-value"));
        assert!(rendered.contains("gpt-4o-mini"));
    }

    #[test]
    fn test_check_config_rejects_invalid() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(
            br#"
[ai]
api_key = "sk-test"
request_timeout_seconds = 0
"#,
        )
        .unwrap();

        assert!(matches!(check_config(Some(file.path())), Err(Error::Config(_))));
    }
}
