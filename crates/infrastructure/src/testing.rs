//! In-memory fakes for the collaborator traits.

use crate::dns::DnsResolver;
use crate::error::{Error, Result};
use crate::metadata::MetadataService;
use crate::platform::Platform;
use crate::registry::Registry;
use crate::settings::{Networks, Settings};
use crate::system::{CmdRunner, CommandOutput};
use std::collections::HashMap;
use std::sync::Mutex;

/// Resolver answering from a fixed record table.
#[derive(Debug, Default)]
pub struct FakeDnsResolver {
    records: Vec<(Vec<String>, String, String)>,
    lookup_host_err: Option<String>,
}

impl FakeDnsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, servers: &[&str], host: &str, ip: &str) -> Self {
        self.records.push((
            servers.iter().map(ToString::to_string).collect(),
            host.to_string(),
            ip.to_string(),
        ));
        self
    }

    pub fn with_error(mut self, message: &str) -> Self {
        self.lookup_host_err = Some(message.to_string());
        self
    }
}

impl DnsResolver for FakeDnsResolver {
    fn lookup_host(&self, nameservers: &[String], host: &str) -> Result<String> {
        if let Some(message) = &self.lookup_host_err {
            return Err(Error::dns(message.clone()));
        }

        self.records
            .iter()
            .find(|(servers, record_host, _)| servers == nameservers && record_host == host)
            .map(|(_, _, ip)| ip.clone())
            .ok_or_else(|| Error::dns(format!("no fake record for '{host}'")))
    }
}

/// Runner returning canned stdout per command line and recording every call.
#[derive(Debug, Default)]
pub struct FakeCmdRunner {
    outputs: HashMap<String, String>,
    commands: Mutex<Vec<String>>,
}

impl FakeCmdRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, command_line: &str, stdout: &str) -> Self {
        self.outputs
            .insert(command_line.to_string(), stdout.to_string());
        self
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl CmdRunner for FakeCmdRunner {
    fn run_command(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let command_line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.commands.lock().unwrap().push(command_line.clone());

        match self.outputs.get(&command_line) {
            Some(stdout) => Ok(CommandOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            None => Err(Error::Command {
                command: command_line,
                message: "no fake output registered".to_string(),
            }),
        }
    }
}

/// Metadata service with fixed answers.
#[derive(Debug, Default)]
pub struct FakeMetadataService {
    pub public_key: String,
    pub get_public_key_err: Option<String>,
    pub instance_id: String,
    pub server_name: String,
    pub registry_endpoint: String,
    pub get_registry_endpoint_err: Option<String>,
    pub networks: Option<Networks>,
    pub available: bool,
}

impl MetadataService for FakeMetadataService {
    fn load(&self) -> Result<()> {
        Ok(())
    }

    fn public_key(&self) -> Result<String> {
        match &self.get_public_key_err {
            Some(message) => Err(Error::registry(message.clone())),
            None => Ok(self.public_key.clone()),
        }
    }

    fn instance_id(&self) -> Result<String> {
        Ok(self.instance_id.clone())
    }

    fn server_name(&self) -> Result<String> {
        Ok(self.server_name.clone())
    }

    fn registry_endpoint(&self) -> Result<String> {
        match &self.get_registry_endpoint_err {
            Some(message) => Err(Error::registry(message.clone())),
            None => Ok(self.registry_endpoint.clone()),
        }
    }

    fn networks(&self) -> Result<Option<Networks>> {
        Ok(self.networks.clone())
    }

    fn is_available(&self) -> bool {
        self.available
    }
}

/// Registry returning fixed settings.
#[derive(Debug, Default)]
pub struct FakeRegistry {
    pub settings: Settings,
    pub get_settings_err: Option<String>,
}

impl Registry for FakeRegistry {
    fn get_settings(&self) -> Result<Settings> {
        match &self.get_settings_err {
            Some(message) => Err(Error::registry(message.clone())),
            None => Ok(self.settings.clone()),
        }
    }
}

/// Platform that records requested OS actions.
#[derive(Debug, Default)]
pub struct FakePlatform {
    setup_ssh_err: Option<String>,
    setup_dhcp_err: Option<String>,
    ssh_calls: Mutex<Vec<(String, String)>>,
    dhcp_calls: Mutex<Vec<Networks>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_setup_ssh_err(mut self, message: &str) -> Self {
        self.setup_ssh_err = Some(message.to_string());
        self
    }

    pub fn with_setup_dhcp_err(mut self, message: &str) -> Self {
        self.setup_dhcp_err = Some(message.to_string());
        self
    }

    /// `(public_key, username)` pairs passed to `setup_ssh`
    pub fn ssh_calls(&self) -> Vec<(String, String)> {
        self.ssh_calls.lock().unwrap().clone()
    }

    pub fn dhcp_calls(&self) -> Vec<Networks> {
        self.dhcp_calls.lock().unwrap().clone()
    }
}

impl Platform for FakePlatform {
    fn setup_ssh(&self, public_key: &str, username: &str) -> Result<()> {
        self.ssh_calls
            .lock()
            .unwrap()
            .push((public_key.to_string(), username.to_string()));
        match &self.setup_ssh_err {
            Some(message) => Err(Error::platform(message.clone())),
            None => Ok(()),
        }
    }

    fn setup_dhcp(&self, networks: &Networks) -> Result<()> {
        self.dhcp_calls.lock().unwrap().push(networks.clone());
        match &self.setup_dhcp_err {
            Some(message) => Err(Error::platform(message.clone())),
            None => Ok(()),
        }
    }
}
