//! Subcommand implementations
//!
//! Each command returns the text to print on stdout; diagnostics go through
//! tracing and errors through miette.

mod boot;
mod metadata;
mod platforms;
mod settings;
mod verify;

use crate::cli::Commands;
use bootinfra_infrastructure::{DryRunPlatform, Provider, ProviderDeps, ProviderOptions};
use std::path::Path;
use std::sync::Arc;

/// Load provider options, falling back to defaults when no file is given.
///
/// # Errors
///
/// Returns an error if an explicitly named file is missing or invalid.
pub fn load_options(config: Option<&Path>) -> miette::Result<ProviderOptions> {
    match config {
        Some(path) => Ok(ProviderOptions::from_file(path)?),
        None => Ok(ProviderOptions::default()),
    }
}

/// Provider over the host file system. OS changes are only logged.
#[must_use]
pub fn host_provider(options: &ProviderOptions) -> Provider {
    Provider::new(ProviderDeps::host(Arc::new(DryRunPlatform::new())), options)
}

/// Run `command` and return its stdout.
///
/// # Errors
///
/// Returns the failure of the command, with diagnostics attached.
pub fn execute(command: &Commands, config: Option<&Path>) -> miette::Result<String> {
    let provider = || -> miette::Result<Provider> { Ok(host_provider(&load_options(config)?)) };

    match command {
        Commands::Platforms => Ok(platforms::execute(&provider()?)),
        Commands::Metadata { platform } => metadata::execute(&provider()?, platform),
        Commands::Settings { platform } => settings::execute(&provider()?, platform),
        Commands::Verify { digest, file } => verify::execute(digest, file),
        Commands::Ssh { platform, user } => boot::setup_ssh(&provider()?, platform, user),
        Commands::Networking { platform } => boot::setup_networking(&provider()?, platform),
    }
}
