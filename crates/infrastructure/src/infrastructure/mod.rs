//! Per-platform boot facades
//!
//! An [`Infrastructure`] composes a metadata source, a settings registry, the
//! OS [`Platform`](crate::platform::Platform) and a device path resolver into
//! the operations the agent performs while booting.

mod azure;
mod dummy;
mod warden;

pub use azure::{AzureInfrastructure, azure_registry};
pub use dummy::DummyInfrastructure;
pub use warden::WardenInfrastructure;

use crate::devicepath::DevicePathResolver;
use crate::error::Result;
use crate::settings::{DiskSettings, Networks, Settings};
use std::sync::Arc;

/// Boot operations of one platform.
pub trait Infrastructure: Send + Sync {
    /// Install the platform's public key for `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key cannot be fetched or installed.
    fn setup_ssh(&self, username: &str) -> Result<()>;

    /// Fetch the agent settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot provide settings.
    fn get_settings(&self) -> Result<Settings>;

    /// Apply `networks` to the machine.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the configuration.
    fn setup_networking(&self, networks: &Networks) -> Result<()>;

    /// Device path of the ephemeral disk, empty where there is none.
    fn get_ephemeral_disk_path(&self, disk: &DiskSettings) -> String;

    /// Resolver used for persistent disks.
    fn device_path_resolver(&self) -> Arc<dyn DevicePathResolver>;
}
