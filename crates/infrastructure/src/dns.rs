//! Hostname resolution against explicit nameservers
//!
//! At this stage of boot the system resolver is usually not configured yet, so
//! lookups go straight to the nameservers listed in user data.

use crate::error::{Error, Result};
use crate::system::CmdRunner;
use std::net::IpAddr;
use std::ops::Range;
use std::sync::Arc;

/// Resolves a host using the given nameservers.
pub trait DnsResolver: Send + Sync {
    /// Resolve `host` by asking `nameservers` in order.
    ///
    /// # Errors
    ///
    /// Returns an error if no nameserver produced an address.
    fn lookup_host(&self, nameservers: &[String], host: &str) -> Result<String>;
}

/// Resolver that shells out to `dig`.
pub struct DigDnsResolver {
    runner: Arc<dyn CmdRunner>,
}

impl DigDnsResolver {
    /// Create a resolver that runs `dig` through `runner`
    #[must_use]
    pub fn new(runner: Arc<dyn CmdRunner>) -> Self {
        Self { runner }
    }

    fn lookup_with_server(&self, nameserver: &str, host: &str) -> Result<String> {
        let server_arg = format!("@{nameserver}");
        let output = self
            .runner
            .run_command("dig", &[&server_arg, host, "+short", "+time=1"])
            .map_err(|e| e.wrap("Shelling out to dig"))?;

        let first_line = output.stdout.lines().next().unwrap_or_default().trim();
        if first_line.parse::<IpAddr>().is_err() {
            return Err(Error::dns(format!(
                "resolving host '{host}' with DNS server '{nameserver}' returned no address, got '{first_line}'"
            )));
        }

        Ok(first_line.to_string())
    }
}

impl std::fmt::Debug for DigDnsResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigDnsResolver").finish_non_exhaustive()
    }
}

impl DnsResolver for DigDnsResolver {
    fn lookup_host(&self, nameservers: &[String], host: &str) -> Result<String> {
        if host == "localhost" {
            return Ok("127.0.0.1".to_string());
        }

        if host.parse::<IpAddr>().is_ok() {
            return Ok(host.to_string());
        }

        let mut last_err = None;
        for nameserver in nameservers {
            match self.lookup_with_server(nameserver, host) {
                Ok(ip) => {
                    tracing::debug!(host, nameserver = %nameserver, ip = %ip, "Resolved host");
                    return Ok(ip);
                }
                Err(e) => {
                    tracing::warn!(host, nameserver = %nameserver, error = %e, "Dig lookup failed");
                    last_err = Some(e);
                }
            }
        }

        let message = format!("failed to lookup host '{host}'");
        Err(match last_err {
            Some(cause) => cause.wrap(message),
            None => Error::dns(message),
        })
    }
}

/// Resolver that rewrites only the host part of a URL.
///
/// `http://registry.example.com:25777/path` becomes
/// `http://10.0.0.5:25777/path`. Scheme, credentials, port, path and query are
/// kept as written.
pub struct RegistryEndpointResolver {
    delegate: Arc<dyn DnsResolver>,
}

impl RegistryEndpointResolver {
    /// Wrap `delegate`, which resolves bare hostnames
    #[must_use]
    pub fn new(delegate: Arc<dyn DnsResolver>) -> Self {
        Self { delegate }
    }
}

impl std::fmt::Debug for RegistryEndpointResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryEndpointResolver")
            .finish_non_exhaustive()
    }
}

impl DnsResolver for RegistryEndpointResolver {
    fn lookup_host(&self, nameservers: &[String], endpoint: &str) -> Result<String> {
        if nameservers.is_empty() {
            return Ok(endpoint.to_string());
        }

        let range = host_range(endpoint)?;
        let host = endpoint[range.clone()]
            .trim_start_matches('[')
            .trim_end_matches(']');

        let ip = self
            .delegate
            .lookup_host(nameservers, host)
            .map_err(|e| e.wrap("Looking up registry host"))?;

        let replacement = if ip.contains(':') {
            format!("[{ip}]")
        } else {
            ip
        };

        Ok(format!(
            "{}{replacement}{}",
            &endpoint[..range.start],
            &endpoint[range.end..]
        ))
    }
}

/// Byte range of the host in `url`, excluding credentials and port.
fn host_range(url: &str) -> Result<Range<usize>> {
    let malformed = |reason: &str| Error::MalformedUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let authority_start = url
        .find("://")
        .map(|i| i + 3)
        .ok_or_else(|| malformed("missing scheme"))?;

    let rest = &url[authority_start..];
    let authority = &rest[..rest.find(['/', '?', '#']).unwrap_or(rest.len())];

    let host_offset = authority.rfind('@').map_or(0, |i| i + 1);
    let host_and_port = &authority[host_offset..];

    let host_len = if host_and_port.starts_with('[') {
        host_and_port
            .find(']')
            .map(|i| i + 1)
            .ok_or_else(|| malformed("unterminated IPv6 host"))?
    } else {
        host_and_port.find(':').unwrap_or(host_and_port.len())
    };

    if host_len == 0 {
        return Err(malformed("empty host"));
    }

    let start = authority_start + host_offset;
    Ok(start..start + host_len)
}
