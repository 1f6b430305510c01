//! Operating system actions requested by an infrastructure

use crate::error::Result;
use crate::settings::Networks;

/// Applies OS-level configuration on the machine being booted.
pub trait Platform: Send + Sync {
    /// Install `public_key` as an authorized key for `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key could not be installed.
    fn setup_ssh(&self, public_key: &str, username: &str) -> Result<()>;

    /// Configure the given networks through DHCP.
    ///
    /// # Errors
    ///
    /// Returns an error if the network configuration could not be applied.
    fn setup_dhcp(&self, networks: &Networks) -> Result<()>;
}

/// Platform that only logs what it was asked to do.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunPlatform;

impl DryRunPlatform {
    /// Create a logging-only platform
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Platform for DryRunPlatform {
    fn setup_ssh(&self, public_key: &str, username: &str) -> Result<()> {
        tracing::info!(username, key_len = public_key.len(), "Would set up ssh");
        Ok(())
    }

    fn setup_dhcp(&self, networks: &Networks) -> Result<()> {
        let names: Vec<&str> = networks.keys().map(String::as_str).collect();
        tracing::info!(?names, "Would set up dhcp");
        Ok(())
    }
}
