//! Documents read from the platform and the registry
//!
//! Field names follow the JSON written by the cloud provider interfaces, so
//! the structs deserialize those documents directly. Every section is
//! optional; missing sections decode to their defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Networks keyed by network name.
pub type Networks = BTreeMap<String, Network>;

/// One network interface as described by user data or registry settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// "manual", "dynamic" or "vip"
    #[serde(rename = "type", default)]
    pub network_type: String,
    /// Static address
    #[serde(default)]
    pub ip: String,
    /// Subnet mask
    #[serde(default)]
    pub netmask: String,
    /// Default gateway
    #[serde(default)]
    pub gateway: String,
    /// Which defaults ("dns", "gateway") this network provides
    #[serde(rename = "default", default)]
    pub default_routes: Vec<String>,
    /// Nameservers for this network
    #[serde(default)]
    pub dns: Vec<String>,
    /// Interface MAC address
    #[serde(default)]
    pub mac: String,
}

/// Early-boot configuration injected by the cloud provider interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    /// `server` section
    #[serde(default)]
    pub server: ServerData,
    /// `registry` section
    #[serde(default)]
    pub registry: RegistryData,
    /// `dns` section
    #[serde(default)]
    pub dns: DnsData,
    /// Absent in documents written by older interfaces
    #[serde(default)]
    pub networks: Option<Networks>,
}

/// `server` section of user data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerData {
    /// Server name, also used as a registry key
    #[serde(default)]
    pub name: String,
}

/// `registry` section of user data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryData {
    /// URL or file path of the settings registry
    #[serde(default)]
    pub endpoint: String,
}

/// `dns` section of user data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsData {
    /// Nameservers to resolve the registry endpoint with, in order
    #[serde(default)]
    pub nameserver: Vec<String>,
}

/// Minimal identity document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Instance id
    #[serde(rename = "instance-id", default)]
    pub instance_id: String,
}

/// Agent settings served by the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Agent identity
    #[serde(default)]
    pub agent_id: String,
    /// `vm` section
    #[serde(default)]
    pub vm: VmSettings,
    /// Message bus URL
    #[serde(default)]
    pub mbus: String,
    /// NTP servers
    #[serde(default)]
    pub ntp: Vec<String>,
    /// `blobstore` section
    #[serde(default)]
    pub blobstore: BlobstoreSettings,
    /// `disks` section
    #[serde(default)]
    pub disks: Disks,
    /// Free-form environment passed through to the agent
    #[serde(default)]
    pub env: serde_json::Value,
    /// Networks to configure
    #[serde(default)]
    pub networks: Networks,
}

/// `vm` section of settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmSettings {
    /// VM name
    #[serde(default)]
    pub name: String,
}

/// `blobstore` section of settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlobstoreSettings {
    /// Blobstore type, e.g. "dav" or "s3"
    #[serde(default)]
    pub provider: String,
    /// Provider-specific options
    #[serde(default)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

/// `disks` section of settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Disks {
    /// System disk path
    #[serde(default)]
    pub system: String,
    /// Ephemeral disk path or hint
    #[serde(default)]
    pub ephemeral: String,
    /// Persistent disks keyed by disk id; values are paths or hint objects
    #[serde(default)]
    pub persistent: BTreeMap<String, serde_json::Value>,
}

/// One disk to be located on the machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskSettings {
    /// Disk id from the settings
    #[serde(default)]
    pub id: String,
    /// Volume id on the platform
    #[serde(default)]
    pub volume_id: String,
    /// Device path as given
    #[serde(default)]
    pub path: String,
}
