//! CLI error types.

use kc_reaper::ReaperError;
use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Error from the reconciliation core.
    #[error(transparent)]
    Reaper(#[from] ReaperError),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
