//! Configuration and error types for shingling.
//!
//! Free of any I/O or environment-dependent behavior so the shingle builder
//! stays a pure function of `(canonical_tokens, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of tokens per shingle.
pub const DEFAULT_SHINGLE_SIZE: usize = 5;

/// Token count at which window hashing moves to the rayon pool.
const PARALLEL_MIN_TOKENS: usize = 4096;

/// Configuration for the shingle builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerceptualConfig {
    /// Number of tokens per shingle (k-shingling).
    ///
    /// Larger values demand longer verbatim runs before a match is reported;
    /// smaller values flag common phrases.
    pub k: usize,
    /// Hash windows on the rayon pool for large documents.
    ///
    /// Output is identical to the sequential path.
    pub use_parallel: bool,
}

impl PerceptualConfig {
    /// Create a new configuration with sensible defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shingle size (k).
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Enable or disable parallel hashing.
    pub fn with_parallel(mut self, use_parallel: bool) -> Self {
        self.use_parallel = use_parallel;
        self
    }

    /// Validate configuration parameters. The builder itself tolerates
    /// `k == 0` and yields nothing.
    pub fn validate(&self) -> Result<(), PerceptualError> {
        if self.k < 1 {
            return Err(PerceptualError::InvalidShingleSize { k: self.k });
        }
        Ok(())
    }

    pub(crate) fn parallel_for(&self, token_count: usize) -> bool {
        self.use_parallel && token_count >= PARALLEL_MIN_TOKENS
    }
}

impl Default for PerceptualConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_SHINGLE_SIZE,
            use_parallel: true,
        }
    }
}

/// Errors returned by the perceptual layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PerceptualError {
    #[error("invalid config: shingle size must be >= 1 (got {k})")]
    InvalidShingleSize { k: usize },

    #[error("invalid shingle digest: {0}")]
    InvalidDigest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let cfg = PerceptualConfig::default();
        assert_eq!(cfg.k, 5);
        assert!(cfg.use_parallel);
    }

    #[test]
    fn config_validate_rejects_zero_k() {
        let cfg = PerceptualConfig::new().with_k(0);
        assert_eq!(
            cfg.validate(),
            Err(PerceptualError::InvalidShingleSize { k: 0 })
        );
        assert!(PerceptualConfig::new().with_k(1).validate().is_ok());
    }

    #[test]
    fn parallel_only_for_large_inputs() {
        let cfg = PerceptualConfig::new().with_parallel(true);
        assert!(!cfg.parallel_for(10));
        assert!(cfg.parallel_for(PARALLEL_MIN_TOKENS));
        assert!(!cfg.with_parallel(false).parallel_for(1_000_000));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = PerceptualConfig::new().with_k(7).with_parallel(false);
        let serialized = serde_json::to_string(&cfg).unwrap();
        let deserialized: PerceptualConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(cfg, deserialized);
    }

    #[test]
    fn error_display_mentions_k() {
        let err = PerceptualError::InvalidShingleSize { k: 0 };
        assert!(err.to_string().contains("shingle size must be >= 1"));
    }
}
