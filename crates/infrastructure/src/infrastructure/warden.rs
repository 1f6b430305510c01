//! Warden facade

use super::Infrastructure;
use crate::devicepath::DevicePathResolver;
use crate::error::Result;
use crate::registry::RegistryProvider;
use crate::settings::{DiskSettings, Networks, Settings};
use std::sync::Arc;

/// Warden (container) boot facade.
///
/// The container host configures SSH and networking itself, so those
/// operations succeed without doing anything. The registry is chosen again on
/// every settings fetch because the metadata may point at either a URL or a
/// settings file.
pub struct WardenInfrastructure {
    registry_provider: RegistryProvider,
    device_path_resolver: Arc<dyn DevicePathResolver>,
}

impl WardenInfrastructure {
    /// Create a facade fetching settings through `registry_provider`.
    #[must_use]
    pub fn new(
        registry_provider: RegistryProvider,
        device_path_resolver: Arc<dyn DevicePathResolver>,
    ) -> Self {
        Self {
            registry_provider,
            device_path_resolver,
        }
    }
}

impl std::fmt::Debug for WardenInfrastructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WardenInfrastructure")
            .field("registry_provider", &self.registry_provider)
            .finish_non_exhaustive()
    }
}

impl Infrastructure for WardenInfrastructure {
    fn setup_ssh(&self, username: &str) -> Result<()> {
        tracing::debug!(username, "Warden containers have ssh configured by the host");
        Ok(())
    }

    fn get_settings(&self) -> Result<Settings> {
        let registry = self
            .registry_provider
            .get_registry()
            .map_err(|e| e.wrap("Getting registry"))?;

        registry
            .get_settings()
            .map_err(|e| e.wrap("Getting settings from registry"))
    }

    fn setup_networking(&self, _networks: &Networks) -> Result<()> {
        Ok(())
    }

    fn get_ephemeral_disk_path(&self, _disk: &DiskSettings) -> String {
        String::new()
    }

    fn device_path_resolver(&self) -> Arc<dyn DevicePathResolver> {
        Arc::clone(&self.device_path_resolver)
    }
}
