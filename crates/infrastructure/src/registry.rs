//! Settings registries
//!
//! The registry is where the director publishes the full agent settings. It
//! is either an HTTP service keyed by instance id or, on local platforms, a
//! JSON file.

use crate::error::{Error, Result};
use crate::metadata::MetadataService;
use crate::settings::Settings;
use crate::system::FileSystem;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Source of agent settings.
pub trait Registry: Send + Sync {
    /// Fetch the current settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry is unreachable or the payload is
    /// malformed.
    fn get_settings(&self) -> Result<Settings>;
}

/// Envelope returned by the HTTP registry; `settings` is itself JSON.
#[derive(Debug, Deserialize)]
struct SettingsWrapper {
    settings: String,
}

/// Registry served over HTTP at `<endpoint>/instances/<id>/settings`.
pub struct HttpRegistry {
    metadata_service: Arc<dyn MetadataService>,
    use_server_name_as_id: bool,
    client: reqwest::blocking::Client,
}

impl HttpRegistry {
    /// Create a registry addressed through `metadata_service`.
    ///
    /// With `use_server_name_as_id` the server name replaces the instance id
    /// in the request path.
    #[must_use]
    pub fn new(metadata_service: Arc<dyn MetadataService>, use_server_name_as_id: bool) -> Self {
        Self {
            metadata_service,
            use_server_name_as_id,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Whether the server name is used as the registry key.
    #[must_use]
    pub const fn uses_server_name_as_id(&self) -> bool {
        self.use_server_name_as_id
    }

    fn identifier(&self) -> Result<String> {
        if self.use_server_name_as_id {
            self.metadata_service
                .server_name()
                .map_err(|e| e.wrap("Getting server name"))
        } else {
            self.metadata_service
                .instance_id()
                .map_err(|e| e.wrap("Getting instance id"))
        }
    }

    fn fetch(&self, url: &str) -> Result<String> {
        let http_err = |source| Error::Http {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::registry(format!("'{url}' responded with {status}")));
        }

        response.text().map_err(http_err)
    }
}

impl std::fmt::Debug for HttpRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRegistry")
            .field("use_server_name_as_id", &self.use_server_name_as_id)
            .finish_non_exhaustive()
    }
}

impl Registry for HttpRegistry {
    fn get_settings(&self) -> Result<Settings> {
        let id = self.identifier()?;

        let endpoint = self
            .metadata_service
            .registry_endpoint()
            .map_err(|e| e.wrap("Getting registry endpoint"))?;

        let url = format!("{endpoint}/instances/{id}/settings");
        tracing::debug!(url = %url, "Fetching settings from registry");

        let body = self
            .fetch(&url)
            .map_err(|e| e.wrap("Getting settings from url"))?;

        let wrapper: SettingsWrapper = serde_json::from_str(&body)
            .map_err(|e| Error::json(e, "Unmarshalling settings wrapper"))?;

        serde_json::from_str(&wrapper.settings)
            .map_err(|e| Error::json(e, "Unmarshalling wrapped settings"))
    }
}

/// Registry backed by a local settings document.
pub struct FileRegistry {
    path: PathBuf,
    fs: Arc<dyn FileSystem>,
}

impl FileRegistry {
    /// Registry reading the settings document at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            path: path.into(),
            fs,
        }
    }

    /// Settings document read by this registry
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl std::fmt::Debug for FileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileRegistry")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Registry for FileRegistry {
    fn get_settings(&self) -> Result<Settings> {
        let contents = self
            .fs
            .read_file(&self.path)
            .map_err(|e| Error::io(e, &self.path, "Reading settings file"))?;

        tracing::debug!(path = %self.path.display(), "Read settings file");

        serde_json::from_slice(&contents).map_err(|e| Error::json(e, "Unmarshalling settings"))
    }
}

/// Chooses a registry from the metadata service's endpoint on every call.
///
/// An endpoint starting with `http` selects [`HttpRegistry`]; anything else is
/// taken as the path of a settings file.
pub struct RegistryProvider {
    metadata_service: Arc<dyn MetadataService>,
    fs: Arc<dyn FileSystem>,
}

impl RegistryProvider {
    /// Create a provider driven by `metadata_service`.
    #[must_use]
    pub fn new(metadata_service: Arc<dyn MetadataService>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            metadata_service,
            fs,
        }
    }

    /// Build the registry the metadata currently points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry endpoint cannot be determined.
    pub fn get_registry(&self) -> Result<Box<dyn Registry>> {
        let endpoint = self
            .metadata_service
            .registry_endpoint()
            .map_err(|e| e.wrap("Getting registry endpoint"))?;

        if endpoint.starts_with("http") {
            tracing::debug!(endpoint = %endpoint, "Using http registry");
            return Ok(Box::new(HttpRegistry::new(
                Arc::clone(&self.metadata_service),
                true,
            )));
        }

        tracing::debug!(path = %endpoint, "Using file registry");
        Ok(Box::new(FileRegistry::new(endpoint, Arc::clone(&self.fs))))
    }
}

impl std::fmt::Debug for RegistryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryProvider").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::OsFileSystem;
    use crate::testing::FakeMetadataService;
    use mockito::{Mock, Server, ServerGuard};

    /// Registry stub answering one settings request.
    fn registry_server(path: &str, status: usize, body: &str) -> (ServerGuard, Mock) {
        let mut server = Server::new();
        let mock = server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create();
        (server, mock)
    }

    fn wrapped_settings(settings: &str) -> String {
        serde_json::json!({ "settings": settings }).to_string()
    }

    #[test]
    fn test_http_registry_fetches_by_instance_id() {
        let (server, mock) = registry_server(
            "/instances/fake-instance-id/settings",
            200,
            &wrapped_settings(r#"{"agent_id":"fake-agent-id","vm":{"name":"vm-1"}}"#),
        );
        let metadata = FakeMetadataService {
            instance_id: "fake-instance-id".to_string(),
            server_name: "fake-server-name".to_string(),
            registry_endpoint: server.url(),
            ..Default::default()
        };

        let registry = HttpRegistry::new(Arc::new(metadata), false);
        let settings = registry.get_settings().unwrap();

        assert_eq!(settings.agent_id, "fake-agent-id");
        assert_eq!(settings.vm.name, "vm-1");
        mock.assert();
    }

    #[test]
    fn test_http_registry_fetches_by_server_name() {
        let (server, mock) = registry_server(
            "/instances/fake-server-name/settings",
            200,
            &wrapped_settings("{}"),
        );
        let metadata = FakeMetadataService {
            instance_id: "fake-instance-id".to_string(),
            server_name: "fake-server-name".to_string(),
            registry_endpoint: server.url(),
            ..Default::default()
        };

        let registry = HttpRegistry::new(Arc::new(metadata), true);
        registry.get_settings().unwrap();

        mock.assert();
    }

    #[test]
    fn test_http_registry_malformed_wrapper() {
        let (server, _mock) =
            registry_server("/instances/fake-instance-id/settings", 200, "not json");
        let metadata = FakeMetadataService {
            instance_id: "fake-instance-id".to_string(),
            registry_endpoint: server.url(),
            ..Default::default()
        };

        let err = HttpRegistry::new(Arc::new(metadata), false)
            .get_settings()
            .unwrap_err();
        assert!(err.to_string().contains("Unmarshalling settings wrapper"));
    }

    #[test]
    fn test_http_registry_malformed_wrapped_settings() {
        let (server, _mock) = registry_server(
            "/instances/fake-instance-id/settings",
            200,
            &wrapped_settings("{broken"),
        );
        let metadata = FakeMetadataService {
            instance_id: "fake-instance-id".to_string(),
            registry_endpoint: server.url(),
            ..Default::default()
        };

        let err = HttpRegistry::new(Arc::new(metadata), false)
            .get_settings()
            .unwrap_err();
        assert!(err.to_string().contains("Unmarshalling wrapped settings"));
    }

    #[test]
    fn test_http_registry_error_status() {
        let (server, _mock) =
            registry_server("/instances/fake-instance-id/settings", 404, "");
        let metadata = FakeMetadataService {
            instance_id: "fake-instance-id".to_string(),
            registry_endpoint: server.url(),
            ..Default::default()
        };

        let err = HttpRegistry::new(Arc::new(metadata), false)
            .get_settings()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Getting settings from url: "));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_http_registry_endpoint_error() {
        let metadata = FakeMetadataService {
            get_registry_endpoint_err: Some("fake-registry-endpoint-err".to_string()),
            ..Default::default()
        };

        let err = HttpRegistry::new(Arc::new(metadata), false)
            .get_settings()
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Getting registry endpoint: "));
        assert!(msg.contains("fake-registry-endpoint-err"));
    }

    #[test]
    fn test_file_registry_reads_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent-env.json");
        std::fs::write(&path, r#"{"agent_id":"fake-agent-id","mbus":"nats://x"}"#).unwrap();

        let registry = FileRegistry::new(&path, Arc::new(OsFileSystem::new()));
        let settings = registry.get_settings().unwrap();
        assert_eq!(settings.agent_id, "fake-agent-id");
        assert_eq!(settings.mbus, "nats://x");
    }

    #[test]
    fn test_file_registry_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let registry = FileRegistry::new(dir.path().join("missing.json"), Arc::new(OsFileSystem::new()));

        let err = registry.get_settings().unwrap_err();
        assert!(err.to_string().contains("Reading settings file"));
    }

    #[test]
    fn test_registry_provider_selects_file_registry_for_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent-env.json");
        std::fs::write(&path, r#"{"agent_id":"from-file"}"#).unwrap();

        let metadata = FakeMetadataService {
            registry_endpoint: path.to_string_lossy().into_owned(),
            ..Default::default()
        };
        let provider = RegistryProvider::new(Arc::new(metadata), Arc::new(OsFileSystem::new()));

        let registry = provider.get_registry().unwrap();
        assert_eq!(registry.get_settings().unwrap().agent_id, "from-file");
    }

    #[test]
    fn test_registry_provider_selects_http_registry_for_url() {
        let (server, mock) = registry_server(
            "/instances/fake-server-name/settings",
            200,
            &wrapped_settings(r#"{"agent_id":"from-http"}"#),
        );
        let metadata = FakeMetadataService {
            server_name: "fake-server-name".to_string(),
            registry_endpoint: server.url(),
            ..Default::default()
        };
        let provider = RegistryProvider::new(Arc::new(metadata), Arc::new(OsFileSystem::new()));

        let registry = provider.get_registry().unwrap();
        assert_eq!(registry.get_settings().unwrap().agent_id, "from-http");
        mock.assert();
    }

    #[test]
    fn test_registry_provider_endpoint_error() {
        let metadata = FakeMetadataService {
            get_registry_endpoint_err: Some("fake-registry-endpoint-err".to_string()),
            ..Default::default()
        };
        let provider = RegistryProvider::new(Arc::new(metadata), Arc::new(OsFileSystem::new()));

        let err = provider.get_registry().err().unwrap();
        assert!(err.to_string().contains("fake-registry-endpoint-err"));
    }
}
