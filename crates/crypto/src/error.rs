//! Error types for digest parsing and verification

// Rust 1.92 compiler bug: false positives for thiserror/miette derive macro fields
// https://github.com/rust-lang/rust/issues/147648
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Error type for digest operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// A multiple digest was constructed from an empty list
    #[error("No digests have been provided")]
    #[diagnostic(code(bootinfra::crypto::empty))]
    EmptyDigestList,

    /// Nothing in the input could be parsed as a digest
    #[error(
        "No recognizable digest algorithm found in '{input}'. Supported algorithms: sha1, sha256, sha512"
    )]
    #[diagnostic(
        code(bootinfra::crypto::unrecognized),
        help("Digests look like 'sha256:<hex>' and are separated by ';'")
    )]
    NoRecognizableAlgorithm {
        /// The text that failed to parse
        input: String,
    },

    /// An algorithm name or checksum cannot be written in the wire format
    #[error("Invalid digest '{algorithm}:{value}': {reason}")]
    #[diagnostic(code(bootinfra::crypto::invalid))]
    InvalidDigest {
        /// Algorithm name as given
        algorithm: String,
        /// Checksum as given
        value: String,
        /// What makes it invalid
        reason: &'static str,
    },

    /// Two digests in one set use the same algorithm
    #[error("Multiple digests of the same algorithm '{algorithm}' found in digests '{digests}'")]
    #[diagnostic(code(bootinfra::crypto::duplicate))]
    DuplicateAlgorithm {
        /// Name of the repeated algorithm
        algorithm: String,
        /// Full list the duplicate was found in
        digests: String,
    },

    /// The strongest digest uses an algorithm with no implementation
    #[error("Unable to create digest of unsupported algorithm '{algorithm}'")]
    #[diagnostic(
        code(bootinfra::crypto::unsupported),
        help("Supply a sha1, sha256 or sha512 digest alongside newer algorithms")
    )]
    UnsupportedAlgorithm {
        /// Name of the algorithm that cannot be computed
        algorithm: String,
    },

    /// The stream checksum did not match the expected digest
    #[error("Expected stream to have digest '{expected}' but was '{actual}'")]
    #[diagnostic(code(bootinfra::crypto::mismatch))]
    Mismatch {
        /// Expected digest in its textual form
        expected: String,
        /// Computed digest in its textual form
        actual: String,
    },

    /// Reading the stream failed while hashing
    #[error("Reading stream to compute {algorithm} digest: {source}")]
    #[diagnostic(code(bootinfra::crypto::io))]
    Io {
        /// Algorithm being computed
        algorithm: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result type for digest operations
pub type Result<T> = std::result::Result<T, Error>;
