//! Digest sets covering the same artifact with several algorithms
//!
//! The wire format is a `;`-separated list of digests, e.g.
//! `sha1:aaf4...;sha256:2cf2...`. Verification only ever uses the strongest
//! digest in the set.

use crate::digest::{Algorithm, Digest, PREFERRED_ALGORITHMS};
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// Separator between digests in the wire format.
const SEPARATOR: char = ';';

/// A non-empty set of digests for one artifact, at most one per algorithm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleDigest {
    digests: Vec<Digest>,
}

impl MultipleDigest {
    /// Build a digest set from an explicit list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDigestList`] for an empty list and
    /// [`Error::DuplicateAlgorithm`] if two digests share an algorithm.
    pub fn new(digests: Vec<Digest>) -> Result<Self> {
        if digests.is_empty() {
            return Err(Error::EmptyDigestList);
        }

        let set = Self { digests };
        set.validate()?;
        Ok(set)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for digest in &self.digests {
            let name = digest.algorithm().name();
            if !seen.insert(name) {
                return Err(Error::DuplicateAlgorithm {
                    algorithm: name.to_string(),
                    digests: self.to_list_string(),
                });
            }
        }

        Ok(())
    }

    /// All digests in their original order.
    #[must_use]
    pub fn digests(&self) -> &[Digest] {
        &self.digests
    }

    /// The digest used for verification.
    ///
    /// Picks sha512, then sha256, then sha1. If none of those are present the
    /// first digest in the list is used.
    #[must_use]
    pub fn strongest(&self) -> &Digest {
        PREFERRED_ALGORITHMS
            .iter()
            .find_map(|preferred| {
                self.digests
                    .iter()
                    .find(|digest| digest.algorithm() == preferred)
            })
            .unwrap_or(&self.digests[0])
    }

    /// Algorithm of the strongest digest.
    #[must_use]
    pub fn algorithm(&self) -> &Algorithm {
        self.strongest().algorithm()
    }

    /// Verify `reader` against the strongest digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAlgorithm`] if the strongest digest uses an
    /// unknown algorithm, [`Error::Mismatch`] if the checksum differs, and
    /// [`Error::Io`] if reading fails.
    pub fn verify<R: Read>(&self, reader: R) -> Result<()> {
        self.strongest().verify(reader)
    }

    /// Full wire form of every digest, in original order.
    #[must_use]
    pub fn to_list_string(&self) -> String {
        self.digests
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string())
    }
}

/// Renders the strongest digest only; see [`MultipleDigest::to_list_string`]
/// for the full list.
impl fmt::Display for MultipleDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.strongest(), f)
    }
}

impl FromStr for MultipleDigest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digests = s
            .split(SEPARATOR)
            .map(Digest::parse_piece)
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>>>()?;

        if digests.is_empty() {
            return Err(Error::NoRecognizableAlgorithm {
                input: s.to_string(),
            });
        }

        Self::new(digests)
    }
}

impl Serialize for MultipleDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_list_string())
    }
}

impl<'de> Deserialize<'de> for MultipleDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
