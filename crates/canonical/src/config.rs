//! Configuration types for the canonical text layer.
//!
//! [`CanonicalizeConfig`] controls the two knobs that affect which tokens a
//! document produces: the minimum token length and whether Unicode
//! compatibility folding runs before case folding.
//!
//! # Examples
//!
//! ```rust
//! use canonical::CanonicalizeConfig;
//!
//! let config = CanonicalizeConfig::default();
//! assert_eq!(config.min_token_len, 2);
//! assert!(!config.fold_compatibility);
//! ```

use serde::{Deserialize, Serialize};

/// Default minimum token length, in characters.
pub const DEFAULT_MIN_TOKEN_LEN: usize = 2;

/// Configuration for normalization and tokenization.
///
/// Cheap to clone and serde-friendly so it can be embedded in the
/// top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalizeConfig {
    /// Tokens with fewer characters than this are dropped by the tokenizer.
    ///
    /// Single-letter words ("a", "i") and stray digits carry almost no
    /// signal for overlap detection and inflate shingle counts.
    pub min_token_len: usize,

    /// If true, apply Unicode NFKC before case folding.
    ///
    /// Text pulled out of PDFs often contains presentation forms such as the
    /// `ﬁ` ligature. Without folding those characters fall outside `[a-z0-9]`
    /// and split the word in two:
    ///
    /// ```text
    /// "ﬁnal" → "nal"    (fold_compatibility = false, "f" is lost)
    /// "ﬁnal" → "final"  (fold_compatibility = true)
    /// ```
    ///
    /// Off by default so that stored representations stay comparable with
    /// ones built by plain ASCII normalization.
    pub fold_compatibility: bool,
}

impl CanonicalizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_token_len(mut self, min_token_len: usize) -> Self {
        self.min_token_len = min_token_len;
        self
    }

    pub fn with_fold_compatibility(mut self, fold: bool) -> Self {
        self.fold_compatibility = fold;
        self
    }
}

impl Default for CanonicalizeConfig {
    fn default() -> Self {
        Self {
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            fold_compatibility: false,
        }
    }
}
