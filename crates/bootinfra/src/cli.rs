//! Command line definition

use crate::tracing::{LogLevel, TracingFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level arguments.
#[derive(Parser, Debug)]
#[command(name = "bootinfra")]
#[command(about = "Discover boot-time identity, settings and networking for this machine")]
#[command(version)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity of the stderr log.
    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub log_level: LogLevel,

    /// Log line format.
    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,

    /// Provider configuration file; built-in defaults when absent.
    #[arg(
        short = 'c',
        long,
        global = true,
        env = "BOOTINFRA_CONFIG",
        help = "Path to a TOML provider configuration"
    )]
    pub config: Option<PathBuf>,
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List every platform with its availability.
    #[command(about = "List supported platforms and whether each is available here")]
    Platforms,
    /// Show a platform's metadata.
    #[command(about = "Print the metadata a platform reports, as JSON")]
    Metadata {
        /// Platform name
        #[arg(long, short = 'p', help = "Platform name")]
        platform: String,
    },
    /// Show a platform's agent settings.
    #[command(about = "Fetch agent settings from a platform's registry, as JSON")]
    Settings {
        /// Platform name
        #[arg(long, short = 'p', help = "Platform name")]
        platform: String,
    },
    /// Check a file against a digest list.
    #[command(about = "Verify a file against a list of digests")]
    Verify {
        /// Digest list
        #[arg(long, short = 'd', help = "Digests, e.g. 'sha1:abc;sha256:def'")]
        digest: String,
        /// File to verify
        #[arg(help = "File to verify")]
        file: PathBuf,
    },
    /// Install a public key for a user.
    #[command(about = "Install the platform's public key for a user (dry run)")]
    Ssh {
        /// Platform name
        #[arg(long, short = 'p', help = "Platform name")]
        platform: String,
        /// Account that receives the key
        #[arg(long, short = 'u', help = "User to install the key for", default_value = "vcap")]
        user: String,
    },
    /// Configure networking.
    #[command(about = "Apply the platform's networks (dry run)")]
    Networking {
        /// Platform name
        #[arg(long, short = 'p', help = "Platform name")]
        platform: String,
    },
}
