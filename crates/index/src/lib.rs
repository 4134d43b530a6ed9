//! # Document index
//!
//! The repository of processed documents: identity, cached representations,
//! a persisted store and the inverted shingle index.
//!
//! ## Core pieces
//!
//! - [`Repository`] turns a path into an `Arc<DocRepresentation>`, running
//!   extraction, canonicalization and shingling only on a cache miss.
//! - [`DocumentId`] is derived from path, size and modification time by
//!   default ([`FingerprintMode`]).
//! - [`StoreBackend`] abstracts persistence. [`InMemoryBackend`] is for tests;
//!   [`RedbBackend`] keeps one redb file and writes each entry in its own
//!   transaction.
//! - Records are stored as versioned JSON ([`StoredRepresentation`],
//!   [`STORE_SCHEMA_VERSION`]), zstd-compressed by default.
//! - [`ShingleIndex`] maps each digest to the documents containing it. It is
//!   rebuilt from the store on open and never persisted.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use index::{Repository, RepositoryConfig};
//! use ingest::{FileExtractor, NoopRecognizer};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("essay.txt");
//! std::fs::write(&path, "It was the best of times, it was the worst of times").unwrap();
//!
//! let repo = Repository::in_memory(
//!     RepositoryConfig::new(),
//!     Arc::new(FileExtractor::new()),
//!     Arc::new(NoopRecognizer),
//! )
//! .unwrap();
//!
//! let rep = repo.process(&path).unwrap();
//! assert_eq!(rep.token_count, 12);
//! assert!(Arc::ptr_eq(&rep, &repo.process(&path).unwrap()));
//! ```

mod backend;
mod config;
mod error;
mod fingerprint;
mod record;
mod repository;
mod shingle_index;

#[cfg(feature = "backend-redb")]
pub use backend::RedbBackend;
pub use backend::{BackendConfig, InMemoryBackend, StoreBackend};
pub use config::RepositoryConfig;
pub use error::{RepositoryError, StoreError};
pub use fingerprint::{compute_fingerprint, DocumentId, FingerprintMode};
pub use record::{
    excerpt, CompressionCodec, CompressionConfig, DocRepresentation, StoredRepresentation,
    DEFAULT_EXCERPT_CHARS, STORE_SCHEMA_VERSION,
};
pub use repository::Repository;
pub use shingle_index::ShingleIndex;
