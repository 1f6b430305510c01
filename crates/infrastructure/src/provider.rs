//! Composition root mapping platform names to wired infrastructures

use crate::config::ProviderOptions;
use crate::devicepath::{DevicePathResolver, IdentityDevicePathResolver};
use crate::dns::{DigDnsResolver, DnsResolver, RegistryEndpointResolver};
use crate::error::{Error, Result};
use crate::infrastructure::{
    AzureInfrastructure, DummyInfrastructure, Infrastructure, WardenInfrastructure, azure_registry,
};
use crate::metadata::{
    AzureMetadataServiceProvider, FileMetadataServiceProvider, MetadataService,
    MetadataServiceProvider,
};
use crate::platform::Platform;
use crate::registry::RegistryProvider;
use crate::system::{CmdRunner, FileSystem, OsCmdRunner, OsFileSystem};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Host collaborators shared by every platform.
#[derive(Clone)]
pub struct ProviderDeps {
    /// Reads metadata and settings documents
    pub fs: Arc<dyn FileSystem>,
    /// Runs `dig` for registry host lookups
    pub runner: Arc<dyn CmdRunner>,
    /// Applies SSH keys and networks
    pub platform: Arc<dyn Platform>,
}

impl ProviderDeps {
    /// Real file system and process runner around `platform`.
    #[must_use]
    pub fn host(platform: Arc<dyn Platform>) -> Self {
        Self {
            fs: Arc::new(OsFileSystem::new()),
            runner: Arc::new(OsCmdRunner::new()),
            platform,
        }
    }
}

impl std::fmt::Debug for ProviderDeps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderDeps").finish_non_exhaustive()
    }
}

/// Every supported platform, built once and looked up by name.
pub struct Provider {
    infrastructures: BTreeMap<String, Arc<dyn Infrastructure>>,
    metadata_services: BTreeMap<String, Arc<dyn MetadataService>>,
}

impl Provider {
    /// Build all platforms. Performs no I/O.
    #[must_use]
    pub fn new(deps: ProviderDeps, options: &ProviderOptions) -> Self {
        let ProviderDeps {
            fs,
            runner,
            platform,
        } = deps;

        let resolver: Arc<dyn DnsResolver> = Arc::new(RegistryEndpointResolver::new(Arc::new(
            DigDnsResolver::new(runner),
        )));
        let device_path_resolver: Arc<dyn DevicePathResolver> =
            Arc::new(IdentityDevicePathResolver::new());

        let azure_metadata = AzureMetadataServiceProvider::new(
            Arc::clone(&resolver),
            Arc::clone(&fs),
            options.azure.layout(),
            options.azure.home_root.clone(),
        )
        .get();
        let azure: Arc<dyn Infrastructure> = Arc::new(AzureInfrastructure::new(
            Arc::clone(&azure_metadata),
            Arc::new(azure_registry(Arc::clone(&azure_metadata))),
            Arc::clone(&platform),
            Arc::clone(&device_path_resolver),
        ));

        let bosh_dir = &options.bosh_dir;
        let warden_metadata = FileMetadataServiceProvider::new(
            Arc::clone(&resolver),
            Arc::clone(&fs),
            Some(bosh_dir.join("warden-cpi-metadata.json")),
            bosh_dir.join("warden-cpi-user-data.json"),
            bosh_dir.join("warden-cpi-agent-env.json"),
        )
        .get();
        let warden: Arc<dyn Infrastructure> = Arc::new(WardenInfrastructure::new(
            RegistryProvider::new(Arc::clone(&warden_metadata), Arc::clone(&fs)),
            Arc::clone(&device_path_resolver),
        ));

        let dummy: Arc<dyn Infrastructure> = Arc::new(DummyInfrastructure::new(
            bosh_dir,
            Arc::clone(&fs),
            Arc::clone(&device_path_resolver),
        ));

        let infrastructures = BTreeMap::from([
            ("azure".to_string(), azure),
            ("dummy".to_string(), dummy),
            ("warden".to_string(), warden),
        ]);
        let metadata_services = BTreeMap::from([
            ("azure".to_string(), azure_metadata),
            ("warden".to_string(), warden_metadata),
        ]);

        tracing::info!(
            platforms = ?infrastructures.keys().collect::<Vec<_>>(),
            bosh_dir = %bosh_dir.display(),
            "Built infrastructure provider"
        );

        Self {
            infrastructures,
            metadata_services,
        }
    }

    /// Infrastructure registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for unknown names.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Infrastructure>> {
        self.infrastructures
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found("Infrastructure", name))
    }

    /// Registered platform names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.infrastructures.keys().map(String::as_str)
    }

    /// Metadata service behind the named platform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for unknown names and for platforms that
    /// read no metadata.
    pub fn metadata_service(&self, name: &str) -> Result<Arc<dyn MetadataService>> {
        self.metadata_services
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found("Metadata service for", name))
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("platforms", &self.infrastructures.keys().collect::<Vec<_>>())
            .finish()
    }
}
