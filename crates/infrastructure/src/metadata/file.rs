//! Metadata from plain JSON files

use super::{MetadataService, require_server_name, resolve_registry_endpoint};
use crate::dns::DnsResolver;
use crate::error::{Error, Result};
use crate::settings::{Metadata, Networks, UserData};
use crate::system::FileSystem;
use std::path::PathBuf;
use std::sync::Arc;

/// Reads a metadata document and a user-data document from fixed paths.
///
/// Older cloud provider interfaces wrote neither file and instead placed the
/// full agent settings at `settings_path`; the fallbacks below keep those
/// machines booting.
pub struct FileMetadataService {
    metadata_path: Option<PathBuf>,
    user_data_path: PathBuf,
    settings_path: PathBuf,
    resolver: Arc<dyn DnsResolver>,
    fs: Arc<dyn FileSystem>,
}

impl FileMetadataService {
    /// Create a service over the given paths.
    ///
    /// `metadata_path` may be `None`, in which case the instance id is empty.
    #[must_use]
    pub fn new(
        metadata_path: Option<PathBuf>,
        user_data_path: impl Into<PathBuf>,
        settings_path: impl Into<PathBuf>,
        resolver: Arc<dyn DnsResolver>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            metadata_path,
            user_data_path: user_data_path.into(),
            settings_path: settings_path.into(),
            resolver,
            fs,
        }
    }

    fn read_user_data(&self) -> Result<UserData> {
        let contents = self
            .fs
            .read_file(&self.user_data_path)
            .map_err(|e| Error::io(e, &self.user_data_path, "Reading user data"))?;

        let user_data: UserData = serde_json::from_slice(&contents)
            .map_err(|e| Error::json(e, "Unmarshalling user data"))?;

        tracing::debug!(path = %self.user_data_path.display(), ?user_data, "Read user data");
        Ok(user_data)
    }
}

impl std::fmt::Debug for FileMetadataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileMetadataService")
            .field("metadata_path", &self.metadata_path)
            .field("user_data_path", &self.user_data_path)
            .field("settings_path", &self.settings_path)
            .finish_non_exhaustive()
    }
}

impl MetadataService for FileMetadataService {
    fn load(&self) -> Result<()> {
        Ok(())
    }

    fn public_key(&self) -> Result<String> {
        Err(Error::not_found("Public key source", "file metadata"))
    }

    fn instance_id(&self) -> Result<String> {
        let Some(path) = &self.metadata_path else {
            return Ok(String::new());
        };

        let contents = self
            .fs
            .read_file(path)
            .map_err(|e| Error::io(e, path, "Reading metadata file"))?;

        let metadata: Metadata = serde_json::from_slice(&contents)
            .map_err(|e| Error::json(e, "Unmarshalling metadata"))?;

        tracing::debug!(path = %path.display(), ?metadata, "Read metadata");
        Ok(metadata.instance_id)
    }

    fn server_name(&self) -> Result<String> {
        require_server_name(self.read_user_data()?)
    }

    fn registry_endpoint(&self) -> Result<String> {
        if !self.fs.file_exists(&self.user_data_path) {
            tracing::debug!(
                path = %self.settings_path.display(),
                "User data absent, using settings file as registry"
            );
            return Ok(self.settings_path.to_string_lossy().into_owned());
        }

        let user_data = self.read_user_data()?;
        resolve_registry_endpoint(self.resolver.as_ref(), &user_data)
    }

    fn networks(&self) -> Result<Option<Networks>> {
        Ok(self.read_user_data()?.networks)
    }

    fn is_available(&self) -> bool {
        true
    }
}
