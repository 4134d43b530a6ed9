use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use canonical::canonicalize;
use ingest::{extract_text, Extractor, Recognizer};
use perceptual::build_shingles;
use tracing::{debug, info, Level};

use crate::backend::{InMemoryBackend, StoreBackend};
use crate::config::RepositoryConfig;
use crate::error::RepositoryError;
use crate::fingerprint::{compute_fingerprint, DocumentId};
use crate::record::{excerpt, DocRepresentation};
use crate::shingle_index::ShingleIndex;

/// Cache of processed documents plus the inverted shingle index.
///
/// All methods take `&self`; share it as `Arc<Repository>`. When two
/// threads build the same document concurrently, the first insert wins and
/// both callers receive that representation.
pub struct Repository {
    cfg: RepositoryConfig,
    backend: Box<dyn StoreBackend>,
    extractor: Arc<dyn Extractor>,
    recognizer: Arc<dyn Recognizer>,
    reps: RwLock<HashMap<DocumentId, Arc<DocRepresentation>>>,
    index: RwLock<ShingleIndex>,
}

impl Repository {
    /// Open the configured store and rebuild the in-memory map and index from it.
    pub fn open(
        cfg: RepositoryConfig,
        extractor: Arc<dyn Extractor>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Result<Self, RepositoryError> {
        cfg.perceptual.validate()?;
        let backend = cfg.backend.build()?;
        Self::with_backend(cfg, backend, extractor, recognizer)
    }

    /// A repository whose store lives only as long as the value.
    pub fn in_memory(
        cfg: RepositoryConfig,
        extractor: Arc<dyn Extractor>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Result<Self, RepositoryError> {
        cfg.perceptual.validate()?;
        Self::with_backend(cfg, Box::new(InMemoryBackend::new()), extractor, recognizer)
    }

    /// Build over a caller-supplied backend, loading whatever it already holds.
    pub fn with_backend(
        cfg: RepositoryConfig,
        backend: Box<dyn StoreBackend>,
        extractor: Arc<dyn Extractor>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Result<Self, RepositoryError> {
        let start = Instant::now();
        let mut reps = HashMap::new();
        let mut index = ShingleIndex::new();

        backend.scan(&mut |bytes| {
            let rep = cfg.compression.decode_record(bytes)?;
            index.add(&rep.id, &rep.shingles);
            reps.insert(rep.id.clone(), Arc::new(rep));
            Ok(())
        })?;

        info!(
            documents = reps.len(),
            shingles = index.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "repository_loaded"
        );

        Ok(Self {
            cfg,
            backend,
            extractor,
            recognizer,
            reps: RwLock::new(reps),
            index: RwLock::new(index),
        })
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.cfg
    }

    /// The `k` new representations are built with.
    pub fn shingle_size(&self) -> usize {
        self.cfg.perceptual.k
    }

    pub fn compute_fingerprint(&self, path: &Path) -> Result<DocumentId, RepositoryError> {
        compute_fingerprint(path, self.cfg.fingerprint)
    }

    /// Return the representation of `path`, building and persisting it on a miss.
    pub fn process(&self, path: &Path) -> Result<Arc<DocRepresentation>, RepositoryError> {
        let start = Instant::now();
        let id = self.compute_fingerprint(path)?;

        if let Some(rep) = self.get(&id) {
            if rep.shingle_size == self.shingle_size() {
                debug!(doc_id = %id, path = %path.display(), "cache_hit");
                return Ok(rep);
            }
            debug!(
                doc_id = %id,
                cached_k = rep.shingle_size,
                k = self.shingle_size(),
                "cache_stale_shingle_size"
            );
        }

        let span = tracing::span!(Level::INFO, "index.process", doc_id = %id);
        let _guard = span.enter();

        let text = extract_text(path, self.extractor.as_ref(), &self.recognizer, &self.cfg.extract)?;
        let rep = Arc::new(self.build_representation(id, path, text));

        let encoded = self.cfg.compression.encode_record(&rep)?;
        self.backend.put(rep.id.as_str(), &encoded)?;

        let rep = self.insert(rep);
        info!(
            path = %path.display(),
            tokens = rep.token_count,
            shingles = rep.shingles.len(),
            elapsed_micros = start.elapsed().as_micros(),
            "document_processed"
        );
        Ok(rep)
    }

    fn build_representation(&self, id: DocumentId, path: &Path, text: String) -> DocRepresentation {
        let canonical = canonicalize(&text, &self.cfg.canonical);
        let tokens = canonical.token_texts();
        let shingles = build_shingles(&tokens, &self.cfg.perceptual).set;
        DocRepresentation {
            id,
            source_path: path.to_path_buf(),
            shingle_size: self.shingle_size(),
            shingles,
            token_count: tokens.len(),
            text_excerpt: excerpt(&text, self.cfg.excerpt_chars),
            full_text: text,
            normalized_text: canonical.normalized,
            tokens,
        }
    }

    /// Insert unless a current-`k` entry already exists; returns the winner.
    fn insert(&self, rep: Arc<DocRepresentation>) -> Arc<DocRepresentation> {
        let mut reps = self.reps.write().unwrap_or_else(PoisonError::into_inner);
        let mut index = self.index.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = reps.get(&rep.id) {
            if existing.shingle_size == rep.shingle_size {
                return Arc::clone(existing);
            }
            index.remove(&existing.id, &existing.shingles);
        }

        index.add(&rep.id, &rep.shingles);
        reps.insert(rep.id.clone(), Arc::clone(&rep));
        rep
    }

    pub fn get(&self, id: &DocumentId) -> Option<Arc<DocRepresentation>> {
        self.reps
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.reps.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Known documents sharing at least one shingle with `id`, ranked by the
    /// number of shared shingles. Unknown ids have no candidates.
    pub fn candidates(&self, id: &DocumentId) -> Vec<(DocumentId, usize)> {
        let Some(rep) = self.get(id) else {
            return Vec::new();
        };
        self.index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .candidates(&rep.shingles, Some(id))
    }

    pub fn flush(&self) -> Result<(), RepositoryError> {
        Ok(self.backend.flush()?)
    }
}
