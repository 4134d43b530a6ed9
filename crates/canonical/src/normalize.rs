//! Text normalization.
//!
//! The normalizer reduces extracted text to a stream of lowercase ASCII
//! alphanumeric words separated by single spaces:
//!
//! 1. Optionally apply NFKC (see [`CanonicalizeConfig::fold_compatibility`])
//! 2. Lowercase
//! 3. Replace every character outside `[a-z0-9]` with a space
//! 4. Collapse whitespace runs and trim
//!
//! Steps 3 and 4 run in a single pass: any non-alphanumeric character only
//! ever sets a pending-space flag, and that space is emitted lazily before
//! the next kept character. Leading and trailing separators therefore never
//! reach the output.
//!
//! # Examples
//!
//! ```rust
//! use canonical::{normalize_text, CanonicalizeConfig};
//!
//! let cfg = CanonicalizeConfig::default();
//! assert_eq!(normalize_text("  Hello,\tWORLD!! 42 ", &cfg), "hello world 42");
//! assert_eq!(normalize_text("¿Qué?", &cfg), "qu");
//! ```

use std::borrow::Cow;

use unicode_normalization::UnicodeNormalization;

use crate::config::CanonicalizeConfig;

/// Normalize raw extracted text. Pure and deterministic.
pub fn normalize_text(input: &str, cfg: &CanonicalizeConfig) -> String {
    let folded: Cow<str> = if cfg.fold_compatibility {
        Cow::Owned(input.nfkc().collect::<String>())
    } else {
        Cow::Borrowed(input)
    };

    let mut out = String::with_capacity(folded.len());
    let mut pending_space = false;

    // Lowercasing can expand one character into several (e.g. 'İ' -> "i̇").
    for ch in folded.chars().flat_map(char::to_lowercase) {
        if is_kept(ch) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        } else {
            pending_space = true;
        }
    }

    out
}

#[inline]
fn is_kept(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit()
}
