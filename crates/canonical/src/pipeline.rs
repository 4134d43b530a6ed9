use crate::config::CanonicalizeConfig;
use crate::document::CanonicalizedText;
use crate::normalize::normalize_text;
use crate::token::tokenize;

/// Main entry point: normalize raw text and tokenize the result.
///
/// Never fails. Text with no alphanumeric content yields an empty
/// [`CanonicalizedText`]; downstream stages treat that as a textless
/// document rather than an error.
pub fn canonicalize(input: &str, cfg: &CanonicalizeConfig) -> CanonicalizedText {
    let normalized = normalize_text(input, cfg);
    let tokens = tokenize(&normalized, cfg.min_token_len);
    CanonicalizedText { normalized, tokens }
}
