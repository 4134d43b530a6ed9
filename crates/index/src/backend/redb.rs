//! Redb backend for the document store.
//!
//! One file holds one table keyed by document id. Every `put` is its own
//! write transaction, so adding a document never rewrites the rest of the
//! store. Redb serializes writers across threads.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::backend::StoreBackend;
use crate::error::StoreError;

const DOC_REPS: TableDefinition<&str, &[u8]> = TableDefinition::new("doc_reps");

/// Persistent backend over a single redb file.
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Open or create the store at `path`, creating parent directories.
    ///
    /// # Example
    /// ```no_run
    /// use index::RedbBackend;
    ///
    /// let backend = RedbBackend::open("plagiarism_cache/doc_reps.redb").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                StoreError::backend(format!("cannot create {}: {e}", parent.display()))
            })?;
        }

        let db = Database::create(path).map_err(|e| StoreError::backend(e.to_string()))?;

        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            let _table = write_txn
                .open_table(DOC_REPS)
                .map_err(|e| StoreError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl StoreBackend for RedbBackend {
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(DOC_REPS)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            table
                .insert(key, value)
                .map_err(|e| StoreError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(())
    }

    fn scan(
        &self,
        visitor: &mut dyn FnMut(&[u8]) -> Result<(), StoreError>,
    ) -> Result<(), StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let table = read_txn
            .open_table(DOC_REPS)
            .map_err(|e| StoreError::backend(e.to_string()))?;

        for item in table
            .iter()
            .map_err(|e| StoreError::backend(e.to_string()))?
        {
            let (_, value) = item.map_err(|e| StoreError::backend(e.to_string()))?;
            visitor(value.value())?;
        }
        Ok(())
    }
}
