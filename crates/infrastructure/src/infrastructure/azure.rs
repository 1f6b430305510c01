//! Azure facade

use super::Infrastructure;
use crate::devicepath::DevicePathResolver;
use crate::error::Result;
use crate::metadata::MetadataService;
use crate::platform::Platform;
use crate::registry::{HttpRegistry, Registry};
use crate::settings::{DiskSettings, Networks, Settings};
use std::sync::Arc;

const EPHEMERAL_DISK_PATH: &str = "/dev/sdb";

/// Registry used on Azure: HTTP, keyed by instance id.
#[must_use]
pub fn azure_registry(metadata_service: Arc<dyn MetadataService>) -> HttpRegistry {
    HttpRegistry::new(metadata_service, false)
}

/// Azure boot facade.
pub struct AzureInfrastructure {
    metadata_service: Arc<dyn MetadataService>,
    registry: Arc<dyn Registry>,
    platform: Arc<dyn Platform>,
    device_path_resolver: Arc<dyn DevicePathResolver>,
}

impl AzureInfrastructure {
    /// Compose the facade from its collaborators.
    #[must_use]
    pub fn new(
        metadata_service: Arc<dyn MetadataService>,
        registry: Arc<dyn Registry>,
        platform: Arc<dyn Platform>,
        device_path_resolver: Arc<dyn DevicePathResolver>,
    ) -> Self {
        Self {
            metadata_service,
            registry,
            platform,
            device_path_resolver,
        }
    }
}

impl std::fmt::Debug for AzureInfrastructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureInfrastructure").finish_non_exhaustive()
    }
}

impl Infrastructure for AzureInfrastructure {
    fn setup_ssh(&self, username: &str) -> Result<()> {
        let public_key = self
            .metadata_service
            .public_key()
            .map_err(|e| e.wrap("Error getting public key"))?;

        self.platform.setup_ssh(&public_key, username)
    }

    fn get_settings(&self) -> Result<Settings> {
        self.registry
            .get_settings()
            .map_err(|e| e.wrap("Getting settings from registry"))
    }

    fn setup_networking(&self, networks: &Networks) -> Result<()> {
        self.platform.setup_dhcp(networks)
    }

    fn get_ephemeral_disk_path(&self, _disk: &DiskSettings) -> String {
        EPHEMERAL_DISK_PATH.to_string()
    }

    fn device_path_resolver(&self) -> Arc<dyn DevicePathResolver> {
        Arc::clone(&self.device_path_resolver)
    }
}
