//! Factories binding a metadata variant to its configuration

use super::{AzureLayout, AzureMetadataService, FileMetadataService, MetadataService};
use crate::dns::DnsResolver;
use crate::system::FileSystem;
use std::path::PathBuf;
use std::sync::Arc;

/// Builds the [`MetadataService`] for one platform.
pub trait MetadataServiceProvider {
    /// Construct the service. Never fails and performs no I/O.
    fn get(&self) -> Arc<dyn MetadataService>;
}

/// Provider for [`AzureMetadataService`].
pub struct AzureMetadataServiceProvider {
    resolver: Arc<dyn DnsResolver>,
    fs: Arc<dyn FileSystem>,
    layout: AzureLayout,
    home_root: PathBuf,
}

impl AzureMetadataServiceProvider {
    /// Provider for services reading `layout`, with keys under `home_root`.
    #[must_use]
    pub fn new(
        resolver: Arc<dyn DnsResolver>,
        fs: Arc<dyn FileSystem>,
        layout: AzureLayout,
        home_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            fs,
            layout,
            home_root: home_root.into(),
        }
    }
}

impl MetadataServiceProvider for AzureMetadataServiceProvider {
    fn get(&self) -> Arc<dyn MetadataService> {
        Arc::new(AzureMetadataService::new(
            Arc::clone(&self.resolver),
            Arc::clone(&self.fs),
            self.layout.clone(),
            self.home_root.clone(),
        ))
    }
}

/// Provider for [`FileMetadataService`].
pub struct FileMetadataServiceProvider {
    resolver: Arc<dyn DnsResolver>,
    fs: Arc<dyn FileSystem>,
    metadata_path: Option<PathBuf>,
    user_data_path: PathBuf,
    settings_path: PathBuf,
}

impl FileMetadataServiceProvider {
    /// Provider for services reading the given documents.
    ///
    /// Without `metadata_path` the instance id comes from the settings file.
    #[must_use]
    pub fn new(
        resolver: Arc<dyn DnsResolver>,
        fs: Arc<dyn FileSystem>,
        metadata_path: Option<PathBuf>,
        user_data_path: impl Into<PathBuf>,
        settings_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            resolver,
            fs,
            metadata_path,
            user_data_path: user_data_path.into(),
            settings_path: settings_path.into(),
        }
    }
}

impl MetadataServiceProvider for FileMetadataServiceProvider {
    fn get(&self) -> Arc<dyn MetadataService> {
        Arc::new(FileMetadataService::new(
            self.metadata_path.clone(),
            self.user_data_path.clone(),
            self.settings_path.clone(),
            Arc::clone(&self.resolver),
            Arc::clone(&self.fs),
        ))
    }
}
