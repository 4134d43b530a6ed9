use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::StoreError;

/// Key-value storage for encoded document representations.
/// Keys are document ids; values are opaque encoded records.
///
/// The repository loads everything once through `scan` and only ever adds
/// or replaces records afterwards.
pub trait StoreBackend: Send + Sync {
    /// Insert or replace one entry.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
    /// Visit every stored value.
    fn scan(
        &self,
        visitor: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError>;
    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Selects and builds a backend.
///
/// # Example
/// ```
/// use index::BackendConfig;
///
/// let config = BackendConfig::in_memory();
/// let config = BackendConfig::redb("plagiarism_cache/doc_reps.redb");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BackendConfig {
    /// A single redb file. Missing parent directories are created.
    Redb { path: PathBuf },
    /// Nothing survives the process.
    #[default]
    InMemory,
}

impl BackendConfig {
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    pub fn redb<P: Into<PathBuf>>(path: P) -> Self {
        BackendConfig::Redb { path: path.into() }
    }

    pub fn build(&self) -> Result<Box<dyn StoreBackend>, StoreError> {
        match self {
            BackendConfig::InMemory => Ok(Box::new(InMemoryBackend::new())),
            BackendConfig::Redb { path } => {
                #[cfg(feature = "backend-redb")]
                {
                    Ok(Box::new(RedbBackend::open(path)?))
                }
                #[cfg(not(feature = "backend-redb"))]
                {
                    let _ = path;
                    Err(StoreError::backend("redb backend disabled at compile time"))
                }
            }
        }
    }
}

/// An in-memory backend using a `RwLock` around a `HashMap`.
#[derive(Default)]
pub struct InMemoryBackend {
    records: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreBackend for InMemoryBackend {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(|_| StoreError::backend("poisoned lock"))?
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn scan(
        &self,
        visitor: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|_| StoreError::backend("poisoned lock"))?;
        for value in guard.values() {
            visitor(value)?;
        }
        Ok(())
    }
}

#[cfg(feature = "backend-redb")]
pub mod redb;

#[cfg(feature = "backend-redb")]
pub use self::redb::RedbBackend;
