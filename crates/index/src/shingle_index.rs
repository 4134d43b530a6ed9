use std::collections::BTreeSet;

use hashbrown::HashMap;
use perceptual::{ShingleDigest, ShingleSet};

use crate::fingerprint::DocumentId;

/// Inverted index from shingle digest to the documents containing it.
///
/// Rebuilt from the store on startup and never persisted itself.
#[derive(Debug, Default, Clone)]
pub struct ShingleIndex {
    postings: HashMap<ShingleDigest, BTreeSet<DocumentId>>,
}

impl ShingleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: &DocumentId, shingles: &ShingleSet) {
        for digest in shingles {
            self.postings.entry(*digest).or_default().insert(id.clone());
        }
    }

    /// Drop `id` from the postings of `shingles`, pruning empty lists.
    pub fn remove(&mut self, id: &DocumentId, shingles: &ShingleSet) {
        for digest in shingles {
            if let Some(ids) = self.postings.get_mut(digest) {
                ids.remove(id);
                if ids.is_empty() {
                    self.postings.remove(digest);
                }
            }
        }
    }

    /// Posting list of one digest.
    pub fn documents_with(&self, digest: &ShingleDigest) -> Option<&BTreeSet<DocumentId>> {
        self.postings.get(digest)
    }

    /// Documents sharing at least one shingle with `shingles`, most shared first.
    /// `exclude` is left out of the result. Ties are ordered by id.
    pub fn candidates(
        &self,
        shingles: &ShingleSet,
        exclude: Option<&DocumentId>,
    ) -> Vec<(DocumentId, usize)> {
        let mut shared: HashMap<&DocumentId, usize> = HashMap::new();
        for digest in shingles {
            if let Some(ids) = self.documents_with(digest) {
                for id in ids {
                    if Some(id) != exclude {
                        *shared.entry(id).or_default() += 1;
                    }
                }
            }
        }

        let mut ranked: Vec<(DocumentId, usize)> = shared
            .into_iter()
            .map(|(id, count)| (id.clone(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Number of distinct digests indexed.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
