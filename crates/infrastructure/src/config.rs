//! Provider configuration
//!
//! Every key is optional and defaults to the paths a stock agent installation
//! uses:
//!
//! ```toml
//! bosh_dir = "/var/vcap/bosh"
//!
//! [azure]
//! layout = "goal-state"   # or "wala-dir"
//! wala_dir = "/var/lib/waagent"
//! user_data_path = "/var/lib/waagent/CustomData"
//! goal_state_path = "/var/lib/waagent/GoalState.1.xml"
//! ovf_env_path = "/var/lib/waagent/ovf-env.xml"
//! home_root = "/home"
//! ```

use crate::error::{Error, Result};
use crate::metadata::AzureLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_BOSH_DIR: &str = "/var/vcap/bosh";
const DEFAULT_WALA_DIR: &str = "/var/lib/waagent";

/// Options for [`Provider`](crate::Provider) construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderOptions {
    /// Agent state directory holding the warden and dummy documents
    pub bosh_dir: PathBuf,
    /// Azure metadata locations
    pub azure: AzureOptions,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            bosh_dir: PathBuf::from(DEFAULT_BOSH_DIR),
            azure: AzureOptions::default(),
        }
    }
}

impl ProviderOptions {
    /// Parse options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid TOML or unknown keys.
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|source| Error::Config { source })
    }

    /// Read and parse a TOML options file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::io(e, path, "Reading configuration file"))?;

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Self::from_toml(&contents)
    }
}

/// Which [`AzureLayout`] to read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AzureLayoutKind {
    /// Fixed paths for user data, GoalState and ovf-env
    #[default]
    GoalState,
    /// Everything under one agent directory; the instance id is the server name
    WalaDir,
}

/// `[azure]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AzureOptions {
    /// Layout to read
    pub layout: AzureLayoutKind,
    /// Agent directory, used by the `wala-dir` layout
    pub wala_dir: PathBuf,
    /// Base64 user data, used by the `goal-state` layout
    pub user_data_path: PathBuf,
    /// GoalState document holding `InstanceId`
    pub goal_state_path: PathBuf,
    /// ovf-env document holding `UserName`
    pub ovf_env_path: PathBuf,
    /// Parent of the user home directories holding `authorized_keys`
    pub home_root: PathBuf,
}

impl Default for AzureOptions {
    fn default() -> Self {
        let wala_dir = PathBuf::from(DEFAULT_WALA_DIR);
        Self {
            layout: AzureLayoutKind::default(),
            user_data_path: wala_dir.join("CustomData"),
            goal_state_path: wala_dir.join("GoalState.1.xml"),
            ovf_env_path: wala_dir.join("ovf-env.xml"),
            wala_dir,
            home_root: PathBuf::from("/home"),
        }
    }
}

impl AzureOptions {
    /// The configured layout with its paths filled in.
    #[must_use]
    pub fn layout(&self) -> AzureLayout {
        match self.layout {
            AzureLayoutKind::GoalState => AzureLayout::GoalState {
                user_data_path: self.user_data_path.clone(),
                goal_state_path: self.goal_state_path.clone(),
                ovf_env_path: self.ovf_env_path.clone(),
            },
            AzureLayoutKind::WalaDir => AzureLayout::WalaDir {
                dir: self.wala_dir.clone(),
            },
        }
    }
}
