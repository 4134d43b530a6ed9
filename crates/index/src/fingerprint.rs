//! Document identity.
//!
//! A [`DocumentId`] decides whether a file has been seen before. The default
//! [`FingerprintMode::Metadata`] hashes the path, the byte size and the
//! modification time in whole seconds, so editing a file in place without
//! changing its size inside the same second keeps the old identity.
//! [`FingerprintMode::Content`] hashes the bytes instead, at the cost of a
//! full read on every lookup.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::RepositoryError;

/// Lowercase SHA-256 hex identifying one version of one document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wrap an already computed hex digest.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintMode {
    /// Path, size and whole-second modification time.
    #[default]
    Metadata,
    /// File bytes.
    Content,
}

/// Compute the identity of the file at `path`.
pub fn compute_fingerprint(path: &Path, mode: FingerprintMode) -> Result<DocumentId, RepositoryError> {
    let meta = fs::metadata(path).map_err(|e| RepositoryError::input(path, e))?;
    let mut hasher = Sha256::new();

    match mode {
        FingerprintMode::Metadata => {
            let mtime = meta.modified().map(unix_seconds).unwrap_or(0);
            hasher.update(path.to_string_lossy().as_bytes());
            hasher.update(meta.len().to_string().as_bytes());
            hasher.update(mtime.to_string().as_bytes());
        }
        FingerprintMode::Content => {
            let mut file = fs::File::open(path).map_err(|e| RepositoryError::input(path, e))?;
            let mut buf = [0u8; 64 * 1024];
            loop {
                let n = file
                    .read(&mut buf)
                    .map_err(|e| RepositoryError::input(path, e))?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
        }
    }

    Ok(DocumentId(hex::encode(hasher.finalize())))
}

/// Whole seconds since the epoch, truncated toward zero.
fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => -(before.duration().as_secs() as i64),
    }
}
