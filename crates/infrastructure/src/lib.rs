//! Boot-time infrastructure discovery for bootinfra
//!
//! Early in boot an agent has to answer a few questions before it can talk to
//! anything: who am I, where is my settings registry, which SSH key do I
//! trust, and how is my network laid out. The answers live in files that each
//! cloud provider interface writes differently. This crate hides those
//! differences behind one [`Infrastructure`] per platform, all built by a
//! [`Provider`].
//!
//! ```no_run
//! use bootinfra_infrastructure::{DryRunPlatform, Provider, ProviderDeps, ProviderOptions};
//! use std::sync::Arc;
//!
//! let provider = Provider::new(
//!     ProviderDeps::host(Arc::new(DryRunPlatform::new())),
//!     &ProviderOptions::default(),
//! );
//! let azure = provider.get("azure")?;
//! let settings = azure.get_settings()?;
//! # Ok::<(), bootinfra_infrastructure::Error>(())
//! ```

pub mod config;
pub mod devicepath;
pub mod dns;
mod error;
pub mod infrastructure;
pub mod metadata;
pub mod platform;
mod provider;
pub mod registry;
pub mod settings;
pub mod system;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{AzureLayoutKind, AzureOptions, ProviderOptions};
pub use devicepath::{DevicePathResolver, IdentityDevicePathResolver};
pub use dns::{DigDnsResolver, DnsResolver, RegistryEndpointResolver};
pub use error::{Error, Result};
pub use infrastructure::{
    AzureInfrastructure, DummyInfrastructure, Infrastructure, WardenInfrastructure,
};
pub use metadata::{
    AzureLayout, AzureMetadataService, AzureMetadataServiceProvider, FileMetadataService,
    FileMetadataServiceProvider, MetadataService, MetadataServiceProvider,
};
pub use platform::{DryRunPlatform, Platform};
pub use provider::{Provider, ProviderDeps};
pub use registry::{FileRegistry, HttpRegistry, Registry, RegistryProvider};
pub use settings::{DiskSettings, Network, Networks, Settings, UserData};
pub use system::{CmdRunner, CommandOutput, FileSystem, OsCmdRunner, OsFileSystem};
