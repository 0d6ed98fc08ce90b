//! # kc-reaper-cli
//!
//! Command-line entry point for orphaned session cleanup.
//!
//! This crate provides:
//! - Argument parsing and configuration file resolution
//! - Logging setup
//! - Summary output for a reconciliation pass
//! - A credential check against the token endpoint

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::uninlined_format_args)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
