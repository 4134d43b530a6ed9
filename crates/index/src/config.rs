use canonical::CanonicalizeConfig;
use ingest::ExtractConfig;
use perceptual::PerceptualConfig;

use crate::backend::BackendConfig;
use crate::fingerprint::FingerprintMode;
use crate::record::{CompressionConfig, DEFAULT_EXCERPT_CHARS};

/// Everything a [`Repository`](crate::Repository) needs to turn a path into
/// a cached representation.
#[derive(Clone, Debug)]
pub struct RepositoryConfig {
    /// Where representations are persisted.
    pub backend: BackendConfig,
    /// Compression applied to persisted records.
    pub compression: CompressionConfig,
    pub fingerprint: FingerprintMode,
    pub canonical: CanonicalizeConfig,
    /// Shingle size and parallelism. Entries cached with a different `k`
    /// are rebuilt on their next lookup.
    pub perceptual: PerceptualConfig,
    pub extract: ExtractConfig,
    /// Characters of raw text kept in `text_excerpt`.
    pub excerpt_chars: usize,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            compression: CompressionConfig::default(),
            fingerprint: FingerprintMode::default(),
            canonical: CanonicalizeConfig::default(),
            perceptual: PerceptualConfig::default(),
            extract: ExtractConfig::default(),
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }
}

impl RepositoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_fingerprint(mut self, mode: FingerprintMode) -> Self {
        self.fingerprint = mode;
        self
    }

    pub fn with_canonical(mut self, canonical: CanonicalizeConfig) -> Self {
        self.canonical = canonical;
        self
    }

    pub fn with_perceptual(mut self, perceptual: PerceptualConfig) -> Self {
        self.perceptual = perceptual;
        self
    }

    pub fn with_shingle_size(mut self, k: usize) -> Self {
        self.perceptual = self.perceptual.with_k(k);
        self
    }

    pub fn with_extract(mut self, extract: ExtractConfig) -> Self {
        self.extract = extract;
        self
    }

    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }
}
