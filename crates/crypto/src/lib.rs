//! Digest verification for bootinfra
//!
//! Payloads fetched during early boot (public keys, settings blobs) carry one
//! or more checksums. This crate parses those checksum lists and verifies a
//! byte stream against the strongest algorithm present.
//!
//! ```
//! use bootinfra_crypto::MultipleDigest;
//!
//! let digest: MultipleDigest = "sha1:aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d;\
//!     sha256:2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
//!     .parse()
//!     .unwrap();
//!
//! assert!(digest.verify(&b"hello"[..]).is_ok());
//! ```

mod digest;
mod error;
mod multiple;

pub use digest::{Algorithm, Digest, PREFERRED_ALGORITHMS};
pub use error::{Error, Result};
pub use multiple::MultipleDigest;
