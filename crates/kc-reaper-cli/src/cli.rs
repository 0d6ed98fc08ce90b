//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// kc-reaper - removes Keycloak user sessions no client is bound to.
#[derive(Debug, Parser)]
#[command(name = "kc-reaper")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Service client ID used for the token exchange.
    #[arg(long, env = "KC_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Service client secret used for the token exchange.
    #[arg(long, env = "KC_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Server URL (overrides config).
    #[arg(short, long, env = "KC_SERVER_URL")]
    pub server: Option<String>,

    /// Realm to reconcile (overrides config).
    #[arg(short, long, env = "KC_REALM")]
    pub realm: Option<String>,

    /// Realm holding the service client (overrides config).
    #[arg(long, env = "KC_AUTH_REALM")]
    pub auth_realm: Option<String>,

    /// Configuration file path.
    #[arg(short, long, env = "KC_REAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report orphaned sessions without deleting them.
    #[arg(long)]
    pub dry_run: bool,

    /// Summary output format.
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute (defaults to `run`).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run one reconciliation pass.
    #[default]
    Run,

    /// Check that the client credentials can obtain an access token.
    Check,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// Quiet (no summary).
    Quiet,
}
