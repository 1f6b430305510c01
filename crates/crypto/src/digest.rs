//! Single-algorithm digests

use crate::error::{Error, Result};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// Characters with a meaning in the digest list wire format.
const RESERVED: [char; 2] = [':', ';'];

/// Algorithms in the order they are preferred for verification.
pub const PREFERRED_ALGORITHMS: [Algorithm; 3] =
    [Algorithm::Sha512, Algorithm::Sha256, Algorithm::Sha1];

/// A named hash function.
///
/// Names that are not recognized are kept as [`Algorithm::Unknown`] so that
/// digest lists produced by newer tooling still parse. Such digests can never
/// be verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// SHA-1, the legacy default when no prefix is given
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-512
    Sha512,
    /// Any other algorithm name
    Unknown(String),
}

impl Algorithm {
    /// Look up an algorithm by its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "sha1" => Self::Sha1,
            "sha256" => Self::Sha256,
            "sha512" => Self::Sha512,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Same algorithm with unknown names resolved against the known ones.
    fn normalized(self) -> Self {
        match self {
            Self::Unknown(name) => Self::from_name(&name),
            known => known,
        }
    }

    /// Wire name of the algorithm.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
            Self::Unknown(name) => name,
        }
    }

    /// Relative strength; unknown algorithms rank below everything else.
    #[must_use]
    pub const fn strength(&self) -> u8 {
        match self {
            Self::Sha512 => 3,
            Self::Sha256 => 2,
            Self::Sha1 => 1,
            Self::Unknown(_) => 0,
        }
    }

    /// Whether a checksum can be computed for this algorithm.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// Hash everything `reader` yields and return the resulting digest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAlgorithm`] for unknown algorithms and
    /// [`Error::Io`] if the reader fails.
    pub fn create_digest<R: Read>(&self, reader: R) -> Result<Digest> {
        let value = match self {
            Self::Sha1 => self.hash_with::<Sha1, _>(reader)?,
            Self::Sha256 => self.hash_with::<Sha256, _>(reader)?,
            Self::Sha512 => self.hash_with::<Sha512, _>(reader)?,
            Self::Unknown(name) => {
                return Err(Error::UnsupportedAlgorithm {
                    algorithm: name.clone(),
                });
            }
        };

        Digest::new(self.clone(), value)
    }

    fn hash_with<D, R>(&self, mut reader: R) -> Result<String>
    where
        D: sha2::Digest + Write,
        R: Read,
    {
        let mut hasher = D::new();
        std::io::copy(&mut reader, &mut hasher).map_err(|source| Error::Io {
            algorithm: self.name().to_string(),
            source,
        })?;
        Ok(hex::encode(hasher.finalize()))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A checksum tagged with the algorithm that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    algorithm: Algorithm,
    value: String,
}

impl Digest {
    /// Create a digest from an algorithm and a hex-encoded checksum.
    ///
    /// An [`Algorithm::Unknown`] carrying a known name becomes that known
    /// algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDigest`] if the algorithm name or the value is
    /// empty or contains whitespace, `:` or `;`.
    pub fn new(algorithm: Algorithm, value: impl Into<String>) -> Result<Self> {
        let algorithm = algorithm.normalized();
        let value = value.into();

        let invalid = |reason| Error::InvalidDigest {
            algorithm: algorithm.name().to_string(),
            value: value.clone(),
            reason,
        };
        if algorithm.name().is_empty() {
            return Err(invalid("empty algorithm name"));
        }
        if value.is_empty() {
            return Err(invalid("empty value"));
        }
        if [algorithm.name(), value.as_str()]
            .iter()
            .any(|part| part.contains(RESERVED) || part.contains(char::is_whitespace))
        {
            return Err(invalid("whitespace, ':' and ';' are not allowed"));
        }

        Ok(Self { algorithm, value })
    }

    /// Algorithm of this digest.
    #[must_use]
    pub const fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// Hex-encoded checksum.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Check that `reader` hashes to this digest.
    ///
    /// Hex comparison ignores ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAlgorithm`] for unknown algorithms,
    /// [`Error::Mismatch`] when the checksums differ and [`Error::Io`] if the
    /// reader fails.
    pub fn verify<R: Read>(&self, reader: R) -> Result<()> {
        let actual = self.algorithm.create_digest(reader)?;

        if !actual.value.eq_ignore_ascii_case(&self.value) {
            tracing::debug!(expected = %self, actual = %actual, "Digest mismatch");
            return Err(Error::Mismatch {
                expected: self.to_string(),
                actual: actual.to_string(),
            });
        }

        tracing::debug!(algorithm = %self.algorithm, "Verified digest");
        Ok(())
    }

    /// Parse one `[algorithm ":"] hex` piece. Empty pieces yield `None`.
    pub(crate) fn parse_piece(piece: &str) -> Result<Option<Self>> {
        let piece = piece.trim();
        if piece.is_empty() {
            return Ok(None);
        }

        // Historically digests were sha1 only and carried no prefix.
        match piece.split_once(':') {
            Some((algorithm, value)) => Self::new(Algorithm::from_name(algorithm), value).map(Some),
            None => Self::new(Algorithm::Sha1, piece).map(Some),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.algorithm {
            Algorithm::Sha1 => f.write_str(&self.value),
            _ => write!(f, "{}:{}", self.algorithm, self.value),
        }
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_piece(s)?.ok_or_else(|| Error::NoRecognizableAlgorithm {
            input: s.to_string(),
        })
    }
}
