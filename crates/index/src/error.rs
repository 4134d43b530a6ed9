use std::path::PathBuf;

use ingest::ExtractError;
use perceptual::PerceptualError;
use thiserror::Error;

/// Failures of the persisted store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("Serialization encode error: {0}")]
    Encode(String),
    #[error("Serialization decode error: {0}")]
    Decode(String),
    #[error("Compression error: {0}")]
    Compression(String),
    #[error("Unsupported record schema version {found} (expected {expected})")]
    Schema { found: u16, expected: u16 },
}

impl StoreError {
    pub fn backend<E: std::fmt::Display>(err: E) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Compression(e.to_string())
    }
}

/// Everything [`Repository`](crate::Repository) can fail with.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RepositoryError {
    /// The input path does not exist or cannot be read.
    #[error("cannot access {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("invalid repository configuration: {0}")]
    Config(#[from] PerceptualError),
}

impl RepositoryError {
    pub(crate) fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }
}
