//! Command line front end for bootinfra
//!
//! The binary is a thin wrapper; parsing, configuration loading and command
//! execution live here so they can be tested without spawning a process.

pub mod cli;
pub mod commands;
pub mod tracing;

use crate::cli::Cli;
use crate::tracing::TracingConfig;
use clap::Parser;

/// Parse arguments, initialize tracing and run the requested command.
///
/// # Errors
///
/// Returns the command's failure, ready to be rendered by miette.
pub fn run() -> miette::Result<String> {
    let cli = Cli::parse();

    crate::tracing::init_tracing(&TracingConfig {
        format: cli.log_format,
        level: cli.log_level,
    })?;

    ::tracing::debug!(command = ?cli.command, config = ?cli.config, "Running command");
    commands::execute(&cli.command, cli.config.as_deref())
}
