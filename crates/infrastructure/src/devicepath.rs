//! Mapping disk settings to device paths

use crate::error::{Error, Result};
use crate::settings::DiskSettings;

/// Finds the block device for a disk described by settings.
pub trait DevicePathResolver: Send + Sync {
    /// Device path for `disk`.
    ///
    /// # Errors
    ///
    /// Returns an error if the disk cannot be located.
    fn get_real_device_path(&self, disk: &DiskSettings) -> Result<String>;
}

/// Resolver that trusts the path given in the settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityDevicePathResolver;

impl IdentityDevicePathResolver {
    /// Create the resolver
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DevicePathResolver for IdentityDevicePathResolver {
    fn get_real_device_path(&self, disk: &DiskSettings) -> Result<String> {
        if disk.path.is_empty() {
            return Err(Error::not_found("Device path for disk", disk.id.clone()));
        }
        Ok(disk.path.clone())
    }
}
