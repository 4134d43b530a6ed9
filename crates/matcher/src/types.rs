use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use index::{DocRepresentation, RepositoryError};
use serde::Serialize;
use thiserror::Error;

/// A maximal run of consecutive tokens that are all matched or all unmatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Tokens of the run joined by single spaces.
    pub text: String,
    pub highlighted: bool,
    /// First token index of the run.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
}

impl Segment {
    pub fn token_len(&self) -> usize {
        self.end - self.start
    }
}

/// Metadata printed above a highlighted report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportHeader {
    /// File name of the document being rendered.
    pub document: String,
    /// File name of the document it was compared with.
    pub compared_with: String,
    pub similarity: f64,
    pub matched_tokens: usize,
    pub total_tokens: usize,
}

impl ReportHeader {
    /// Similarity as a percentage with two decimals, e.g. `14.29%`.
    pub fn similarity_percent(&self) -> String {
        format!("{:.2}%", self.similarity * 100.0)
    }
}

/// Similarity and matched token positions of two documents.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    pub similarity: f64,
    pub a: Arc<DocRepresentation>,
    pub b: Arc<DocRepresentation>,
    /// Token indices of `a` covered by a shared shingle.
    pub matched_a: BTreeSet<usize>,
    pub matched_b: BTreeSet<usize>,
}

/// Outcome of [`Comparator::compare`](crate::Comparator::compare).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub similarity: f64,
    pub matched_a: usize,
    pub matched_b: usize,
    pub tokens_a: usize,
    pub tokens_b: usize,
    pub output_a: PathBuf,
    pub output_b: PathBuf,
}

/// Errors returned by comparison and report rendering.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MatchError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report {path}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid matcher config: {0}")]
    InvalidConfig(String),
}
