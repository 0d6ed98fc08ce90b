//! # kc-reaper
//!
//! Deletes Keycloak user sessions that are not bound to any client.

#![forbid(unsafe_code)]
#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use kc_reaper_cli::{
    cli::{Cli, Command},
    commands::{run_check, run_reconcile},
    config,
    output::error,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match config::resolve(&cli) {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command.unwrap_or_default() {
        Command::Run => run_reconcile(&config, cli.output).await,
        Command::Check => run_check(&config, cli.output).await,
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
