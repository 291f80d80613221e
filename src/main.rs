//! Planforge CLI
//!
//! `serve` (default) runs the HTTP API; `check-config` validates configuration.

use clap::Parser;

use planforge::cli::{run_cli_mode, Args};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let exit_code = run_cli_mode(args).await;
    std::process::exit(exit_code);
}
