//! Error types produced by the ingest crate.
//!
//! Two severities:
//!
//! | Error | Severity | Handling |
//! |-------|----------|----------|
//! | [`ExtractError`] | Fatal for the document | Propagated to the caller |
//! | [`RecognitionError`] | Local to one image | Logged, image contributes no text |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failure to pull text out of a document.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ExtractError {
    /// The file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The PDF parser rejected the document.
    #[error("failed to extract PDF text from {path}: {message}")]
    Pdf { path: PathBuf, message: String },

    /// The document exceeds the configured size limit.
    #[error("{path} is {size} bytes, exceeding the limit of {limit}")]
    TooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },
}

impl ExtractError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to recognize text in one embedded image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecognitionError {
    /// The recognizer process could not be started.
    #[error("failed to start recognizer: {0}")]
    Spawn(String),

    /// The recognizer ran and reported failure.
    #[error("recognizer exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// The recognizer did not answer within the configured bound.
    #[error("recognition timed out after {0:?}")]
    Timeout(Duration),

    /// Anything else, including a recognizer that panicked.
    #[error("recognition failed: {0}")]
    Other(String),
}
