//! Metadata from the files the Azure Linux agent provisions

use super::{MetadataService, require_server_name, resolve_registry_endpoint};
use crate::dns::DnsResolver;
use crate::error::{Error, Result};
use crate::settings::{Networks, UserData};
use crate::system::FileSystem;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const OVF_ENV_FILE: &str = "ovf-env.xml";
const CUSTOM_DATA_FILE: &str = "CustomData";

/// How the agent files are laid out on disk.
///
/// Both layouts carry the same information; which one a machine has depends on
/// the agent release that provisioned it, so it is configured, never guessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AzureLayout {
    /// Three independent files, with the instance id taken from the goal state
    GoalState {
        /// Base64-encoded JSON user data
        user_data_path: PathBuf,
        /// Goal state document holding `<InstanceId>`
        goal_state_path: PathBuf,
        /// OVF environment document holding `<UserName>`
        ovf_env_path: PathBuf,
    },
    /// One agent directory holding `ovf-env.xml` and `CustomData`; the
    /// instance id is the server name
    WalaDir {
        /// Agent library directory, usually `/var/lib/waagent`
        dir: PathBuf,
    },
}

impl AzureLayout {
    fn user_data_path(&self) -> PathBuf {
        match self {
            Self::GoalState { user_data_path, .. } => user_data_path.clone(),
            Self::WalaDir { dir } => dir.join(CUSTOM_DATA_FILE),
        }
    }

    fn ovf_env_path(&self) -> PathBuf {
        match self {
            Self::GoalState { ovf_env_path, .. } => ovf_env_path.clone(),
            Self::WalaDir { dir } => dir.join(OVF_ENV_FILE),
        }
    }
}

/// Azure metadata read from agent-provisioned files.
pub struct AzureMetadataService {
    resolver: Arc<dyn DnsResolver>,
    fs: Arc<dyn FileSystem>,
    layout: AzureLayout,
    home_root: PathBuf,
}

impl AzureMetadataService {
    /// Create a service for `layout`.
    ///
    /// The public key is read from `<home_root>/<user>/.ssh/authorized_keys`.
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

    /// Layout this service reads.
    #[must_use]
    pub const fn layout(&self) -> &AzureLayout {
        &self.layout
    }

    /// First `<tag>...</tag>` in the file at `path`, taken literally.
    fn scrape_tag(&self, path: &Path, tag: &str) -> Result<String> {
        let contents = self
            .fs
            .read_file_string(path)
            .map_err(|e| Error::tag_not_found(tag, path, Some(e)))?;

        let escaped = regex::escape(tag);
        let pattern = Regex::new(&format!("<{escaped}>(.*)</{escaped}>")).map_err(|e| {
            Error::tag_not_found(
                tag,
                path,
                Some(std::io::Error::new(std::io::ErrorKind::InvalidInput, e)),
            )
        })?;

        let value = pattern
            .captures(&contents)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| Error::tag_not_found(tag, path, None))?;

        tracing::debug!(path = %path.display(), tag = %tag, value = %value, "Scraped tag");
        Ok(value)
    }

    fn read_user_data(&self) -> Result<UserData> {
        let path = self.layout.user_data_path();
        let contents = self
            .fs
            .read_file(&path)
            .map_err(|e| Error::io(e, &path, "Reading user data file"))?;

        // The agent may wrap the encoded payload across lines.
        let encoded: Vec<u8> = contents
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();

        let decoded = STANDARD.decode(encoded).map_err(|source| Error::Base64 {
            context: "Decoding user data".to_string(),
            source,
        })?;

        let user_data: UserData = serde_json::from_slice(&decoded)
            .map_err(|e| Error::json(e, "Unmarshalling user data"))?;

        tracing::debug!(path = %path.display(), ?user_data, "Read user data");
        Ok(user_data)
    }
}

impl std::fmt::Debug for AzureMetadataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureMetadataService")
            .field("layout", &self.layout)
            .field("home_root", &self.home_root)
            .finish_non_exhaustive()
    }
}

impl MetadataService for AzureMetadataService {
    fn load(&self) -> Result<()> {
        Ok(())
    }

    fn public_key(&self) -> Result<String> {
        let username = self
            .scrape_tag(&self.layout.ovf_env_path(), "UserName")
            .map_err(|e| e.wrap("Reading ovf-env file"))?;

        let key_path = self
            .home_root
            .join(&username)
            .join(".ssh")
            .join("authorized_keys");

        self.fs
            .read_file_string(&key_path)
            .map_err(|e| Error::io(e, &key_path, "Reading public key file"))
    }

    fn instance_id(&self) -> Result<String> {
        match &self.layout {
            AzureLayout::GoalState {
                goal_state_path, ..
            } => self
                .scrape_tag(goal_state_path, "InstanceId")
                .map_err(|e| e.wrap("Reading GoalState file")),
            AzureLayout::WalaDir { .. } => self.server_name(),
        }
    }

    fn server_name(&self) -> Result<String> {
        let user_data = self
            .read_user_data()
            .map_err(|e| e.wrap("Getting user data"))?;
        require_server_name(user_data)
    }

    fn registry_endpoint(&self) -> Result<String> {
        let user_data = self
            .read_user_data()
            .map_err(|e| e.wrap("Getting user data"))?;
        resolve_registry_endpoint(self.resolver.as_ref(), &user_data)
    }

    fn networks(&self) -> Result<Option<Networks>> {
        let user_data = self
            .read_user_data()
            .map_err(|e| e.wrap("Getting user data"))?;
        Ok(user_data.networks)
    }

    fn is_available(&self) -> bool {
        self.fs.file_exists(&self.layout.ovf_env_path())
    }
}
