//! Boot metadata sources
//!
//! A [`MetadataService`] reads whatever the cloud provider interface left on
//! the machine and answers the same handful of identity questions for every
//! platform. Nothing is cached: every accessor reads its source again, since
//! the underlying files can change between polls.
//!
//! - [`FileMetadataService`] - plain JSON files (warden)
//! - [`AzureMetadataService`] - Azure agent files, in either [`AzureLayout`]

mod azure;
mod file;
mod provider;

pub use azure::{AzureLayout, AzureMetadataService};
pub use file::FileMetadataService;
pub use provider::{
    AzureMetadataServiceProvider, FileMetadataServiceProvider, MetadataServiceProvider,
};

use crate::dns::DnsResolver;
use crate::error::{Error, Result};
use crate::settings::{Networks, UserData};

/// Identity and early configuration of this machine.
pub trait MetadataService: Send + Sync {
    /// Prepare the service for use. File-backed services have nothing to do.
    ///
    /// # Errors
    ///
    /// Returns an error if the source could not be discovered.
    fn load(&self) -> Result<()>;

    /// SSH public key for the agent user.
    ///
    /// # Errors
    ///
    /// Returns an error if the key source is missing or unreadable.
    fn public_key(&self) -> Result<String>;

    /// Cloud provider instance id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id source is missing or malformed.
    fn instance_id(&self) -> Result<String>;

    /// Server name assigned by the director.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyServerName`] when the user data names no server.
    fn server_name(&self) -> Result<String>;

    /// Address of the settings registry, resolved through the user-data
    /// nameservers when any are listed.
    ///
    /// # Errors
    ///
    /// Returns an error if user data is malformed or resolution fails.
    fn registry_endpoint(&self) -> Result<String>;

    /// Network configuration, or `None` if user data has no networks section.
    ///
    /// # Errors
    ///
    /// Returns an error if user data is missing or malformed.
    fn networks(&self) -> Result<Option<Networks>>;

    /// Whether this service's source exists on the current machine.
    fn is_available(&self) -> bool;
}

/// Apply the nameservers from user data to its registry endpoint.
pub(crate) fn resolve_registry_endpoint(
    resolver: &dyn DnsResolver,
    user_data: &UserData,
) -> Result<String> {
    let endpoint = &user_data.registry.endpoint;
    let nameservers = &user_data.dns.nameserver;

    if nameservers.is_empty() {
        return Ok(endpoint.clone());
    }

    resolver
        .lookup_host(nameservers, endpoint)
        .map_err(|e| e.wrap("Resolving registry endpoint"))
}

/// Server name from user data; an empty name is an error.
pub(crate) fn require_server_name(user_data: UserData) -> Result<String> {
    if user_data.server.name.is_empty() {
        return Err(Error::EmptyServerName);
    }
    Ok(user_data.server.name)
}
