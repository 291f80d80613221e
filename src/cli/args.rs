//! CLI argument parsing
//!
//! ```text
//! planforge [--config PATH] [--log-json] [serve [--host H] [--port P] | check-config]
//! ```
//! Without a subcommand the server starts.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Parsed CLI arguments
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "planforge", version, about = "AI planning assistant service")]
pub struct Args {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Mode>,
}

/// CLI modes
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Mode {
    /// Start the HTTP server
    Serve {
        /// Overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load and validate configuration, then print it with secrets masked
    CheckConfig,
}

impl Args {
    /// Selected mode, `serve` when none was given
    pub fn mode(&self) -> Mode {
        self.command.clone().unwrap_or(Mode::Serve {
            host: None,
            port: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let args = Args::try_parse_from(["planforge"]).unwrap();
        assert_eq!(
            args.mode(),
            Mode::Serve {
                host: None,
                port: None
            }
        );
        assert!(!args.log_json);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_serve_overrides() {
        let args = Args::try_parse_from([
            "planforge",
            "--config",
            "planforge.toml",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("planforge.toml")));
        assert_eq!(
            args.mode(),
            Mode::Serve {
                host: Some("0.0.0.0".to_string()),
                port: Some(9000)
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["planforge", "check-config", "--log-json"]).unwrap();
        assert_eq!(args.mode(), Mode::CheckConfig);
        assert!(args.log_json);
    }

    #[test]
    fn test_invalid_port_rejected() {
        assert!(Args::try_parse_from(["planforge", "serve", "--port", "http"]).is_err());
    }
}
