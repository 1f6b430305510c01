//! Error types for metadata discovery and infrastructure operations

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for infrastructure operations
///
/// Every variant that wraps a lower-level failure renders that failure's
/// message as part of its own, so callers matching on text still see it.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// I/O error while reading a metadata document
    #[error("{operation} '{}': {source}", path.display())]
    #[diagnostic(
        code(bootinfra::infrastructure::io),
        help("Check that the platform agent has written the file and that it is readable")
    )]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// Path that caused the error
        path: Box<Path>,
        /// What was being done, e.g. "Reading user data file"
        operation: String,
    },

    /// JSON document could not be decoded
    #[error("{context}: {source}")]
    #[diagnostic(code(bootinfra::infrastructure::json))]
    Json {
        /// What was being decoded
        context: String,
        /// The underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Base64 payload could not be decoded
    #[error("{context}: {source}")]
    #[diagnostic(code(bootinfra::infrastructure::base64))]
    Base64 {
        /// What was being decoded
        context: String,
        /// The underlying decode error
        #[source]
        source: base64::DecodeError,
    },

    /// A required tag is missing, or the document holding it is unreadable
    #[error("Tag <{tag}> not found in '{}'{}", path.display(), cause.as_ref().map_or(String::new(), |e| format!(": {e}")))]
    #[diagnostic(code(bootinfra::infrastructure::tag_not_found))]
    TagNotFound {
        /// Tag that was searched for
        tag: String,
        /// Document that was searched
        path: Box<Path>,
        /// Read failure, when the document could not be read at all
        #[source]
        cause: Option<std::io::Error>,
    },

    /// User data names no server
    #[error("Empty server name")]
    #[diagnostic(code(bootinfra::infrastructure::empty_server_name))]
    EmptyServerName,

    /// A URL could not be split into its parts
    #[error("Malformed URL '{url}': {reason}")]
    #[diagnostic(code(bootinfra::infrastructure::url))]
    MalformedUrl {
        /// The offending URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// Hostname resolution failed
    #[error("DNS lookup failed: {message}")]
    #[diagnostic(code(bootinfra::infrastructure::dns))]
    Dns {
        /// Description of the failure
        message: String,
    },

    /// An external command could not be run or exited unsuccessfully
    #[error("Running '{command}': {message}")]
    #[diagnostic(code(bootinfra::infrastructure::command))]
    Command {
        /// Command line that was run
        command: String,
        /// Description of the failure
        message: String,
    },

    /// Registry HTTP request failed
    #[error("Requesting '{url}': {source}")]
    #[diagnostic(
        code(bootinfra::infrastructure::http),
        help("Check that the registry endpoint is reachable from this machine")
    )]
    Http {
        /// Requested URL
        url: String,
        /// The underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Settings could not be obtained from the registry
    #[error("Registry error: {message}")]
    #[diagnostic(code(bootinfra::infrastructure::registry))]
    Registry {
        /// Description of the failure
        message: String,
    },

    /// The platform failed to apply an OS-level change
    #[error("Platform error: {message}")]
    #[diagnostic(code(bootinfra::infrastructure::platform))]
    Platform {
        /// Description of the failure
        message: String,
    },

    /// A named resource does not exist
    #[error("{kind} {name} could not be found")]
    #[diagnostic(code(bootinfra::infrastructure::not_found))]
    NotFound {
        /// Kind of resource, e.g. "Infrastructure"
        kind: String,
        /// Name that was looked up
        name: String,
    },

    /// Configuration could not be parsed
    #[error("Invalid configuration: {source}")]
    #[diagnostic(
        code(bootinfra::infrastructure::config),
        help("Recognised keys are bosh_dir and the [azure] table")
    )]
    Config {
        /// The underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A lower-level error annotated with the stage that produced it
    #[error("{context}: {source}")]
    #[diagnostic(code(bootinfra::infrastructure::wrapped))]
    Wrapped {
        /// Stage description
        context: String,
        /// The underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an I/O error with path context
    #[must_use]
    pub fn io(source: std::io::Error, path: impl AsRef<Path>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.as_ref().into(),
            operation: operation.into(),
        }
    }

    /// Create a JSON decode error
    #[must_use]
    pub fn json(source: serde_json::Error, context: impl Into<String>) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a tag lookup error
    #[must_use]
    pub fn tag_not_found(
        tag: impl Into<String>,
        path: impl Into<PathBuf>,
        cause: Option<std::io::Error>,
    ) -> Self {
        Self::TagNotFound {
            tag: tag.into(),
            path: path.into().into_boxed_path(),
            cause,
        }
    }

    /// Create a DNS error
    #[must_use]
    pub fn dns(message: impl Into<String>) -> Self {
        Self::Dns {
            message: message.into(),
        }
    }

    /// Create a registry error
    #[must_use]
    pub fn registry(message: impl Into<String>) -> Self {
        Self::Registry {
            message: message.into(),
        }
    }

    /// Create a platform error
    #[must_use]
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    /// Create a not found error
    #[must_use]
    pub fn not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Annotate this error with the stage that produced it
    #[must_use]
    pub fn wrap(self, context: impl Into<String>) -> Self {
        Self::Wrapped {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether this error, or any error it wraps, is a not found error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Wrapped { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Result type for infrastructure operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_keeps_original_message() {
        let err = Error::platform("fake-setup-ssh-err").wrap("Setting up ssh");
        let msg = err.to_string();
        assert!(msg.starts_with("Setting up ssh: "));
        assert!(msg.contains("fake-setup-ssh-err"));
    }

    #[test]
    fn test_io_error_names_path() {
        let err = Error::io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            "/var/lib/waagent/CustomData",
            "Reading user data file",
        );
        let msg = err.to_string();
        assert!(msg.contains("/var/lib/waagent/CustomData"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn test_tag_not_found_with_and_without_cause() {
        let missing = Error::tag_not_found("UserName", "ovf-env.xml", None);
        assert_eq!(missing.to_string(), "Tag <UserName> not found in 'ovf-env.xml'");

        let unreadable = Error::tag_not_found(
            "UserName",
            "ovf-env.xml",
            Some(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file")),
        );
        assert!(unreadable.to_string().ends_with(": no such file"));
    }

    #[test]
    fn test_is_not_found_sees_through_wrapping() {
        let err = Error::not_found("Infrastructure", "nonexistent").wrap("Looking up platform");
        assert!(err.is_not_found());
        assert!(!Error::EmptyServerName.is_not_found());
    }
}
