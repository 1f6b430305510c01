//! Dummy CPI facade

use super::Infrastructure;
use crate::devicepath::DevicePathResolver;
use crate::error::Result;
use crate::registry::{FileRegistry, Registry};
use crate::settings::{DiskSettings, Networks, Settings};
use crate::system::FileSystem;
use std::path::Path;
use std::sync::Arc;

const SETTINGS_FILE: &str = "dummy-cpi-agent-env.json";

/// Facade for the dummy CPI used in local testing.
///
/// Settings come from `<bosh_dir>/dummy-cpi-agent-env.json`; nothing is ever
/// applied to the OS.
pub struct DummyInfrastructure {
    registry: FileRegistry,
    device_path_resolver: Arc<dyn DevicePathResolver>,
}

impl DummyInfrastructure {
    /// Read settings from the dummy agent env file under `bosh_dir`.
    #[must_use]
    pub fn new(
        bosh_dir: &Path,
        fs: Arc<dyn FileSystem>,
        device_path_resolver: Arc<dyn DevicePathResolver>,
    ) -> Self {
        Self {
            registry: FileRegistry::new(bosh_dir.join(SETTINGS_FILE), fs),
            device_path_resolver,
        }
    }
}

impl std::fmt::Debug for DummyInfrastructure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DummyInfrastructure")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Infrastructure for DummyInfrastructure {
    fn setup_ssh(&self, _username: &str) -> Result<()> {
        Ok(())
    }

    fn get_settings(&self) -> Result<Settings> {
        self.registry
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
