//! Shingle digest and shingle collection types.
//!
//! The digest's serialized form (32 lowercase hex characters) is part of the
//! persisted document schema; changing the digest function or width means
//! bumping the store's schema version.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::PerceptualError;

/// Width of a shingle digest in bytes.
pub const DIGEST_LEN: usize = 16;

/// Fixed-width digest of one k-token window.
///
/// The first 16 bytes of SHA-256 over the space-joined window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShingleDigest([u8; DIGEST_LEN]);

impl ShingleDigest {
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ShingleDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ShingleDigest {
    type Err = PerceptualError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| PerceptualError::InvalidDigest(format!("{s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl Serialize for ShingleDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ShingleDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Set of distinct shingle digests for one document.
pub type ShingleSet = HashSet<ShingleDigest>;

/// Digest → ascending window start positions.
pub type ShinglePositions = HashMap<ShingleDigest, Vec<usize>>;

/// Output of the shingle builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Shingles {
    /// Shingle size the collection was built with.
    pub k: usize,
    /// Distinct digests.
    pub set: ShingleSet,
    /// Start positions of every occurrence of each digest.
    pub positions: ShinglePositions,
}

impl Shingles {
    pub fn empty(k: usize) -> Self {
        Self {
            k,
            ..Default::default()
        }
    }

    /// Number of distinct shingles.
    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}
