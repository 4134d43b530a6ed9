//! Output type of the canonical layer.

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// Normalized text together with its kept token sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanonicalizedText {
    /// Lowercase `[a-z0-9 ]` text with single-space separators.
    pub normalized: String,
    /// Tokens that passed the minimum-length filter, densely indexed.
    pub tokens: Vec<Token>,
}

impl CanonicalizedText {
    /// Number of kept tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Token texts in order, as owned strings.
    pub fn token_texts(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.text.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
