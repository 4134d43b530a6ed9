//! Canonical text layer.
//!
//! Turns raw extracted text into the token sequence every later stage works
//! on. Shingles, matched positions and report segments are all expressed as
//! indices into the sequence produced here, so this layer must be stable.
//!
//! ## What we do
//!
//! - Lowercasing, optionally after Unicode NFKC
//! - Replacing everything outside `[a-z0-9]` with separators
//! - Whitespace collapsing and trimming
//! - Whitespace tokenization with a minimum token length
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same text and config, same
//! output on any machine.

mod config;
mod document;
mod normalize;
mod pipeline;
mod token;

pub use crate::config::{CanonicalizeConfig, DEFAULT_MIN_TOKEN_LEN};
pub use crate::document::CanonicalizedText;
pub use crate::normalize::normalize_text;
pub use crate::pipeline::canonicalize;
pub use crate::token::{tokenize, Token};
