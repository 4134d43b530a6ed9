//! # Perceptual layer
//!
//! Shingling and set similarity over canonical token streams.
//!
//! ## Contract
//!
//! - Consumes canonical tokens produced by the `canonical` crate; never
//!   normalizes or tokenizes on its own.
//! - Pure functions of `(tokens, config)`: no I/O, no clocks, no global
//!   state.
//!
//! ## Pipeline
//!
//! 1.  **Shingling**: each window of `k` consecutive tokens is space-joined
//!     and hashed into a 128-bit [`ShingleDigest`]. The builder returns both
//!     the distinct digests and, for each digest, every window start
//!     position, which the matcher uses to map shared shingles back onto
//!     token positions.
//!
//! 2.  **Similarity**: [`jaccard`] compares two documents' digest sets.
//!
//! ## Example
//!
//! ```
//! use perceptual::{build_shingles, jaccard, PerceptualConfig};
//!
//! let cfg = PerceptualConfig::new().with_k(3);
//! let a = build_shingles(&["the", "quick", "brown", "fox", "jumps", "over"], &cfg);
//! let b = build_shingles(&["a", "quick", "brown", "fox", "leaps", "over"], &cfg);
//!
//! assert_eq!(a.len(), 4);
//! assert!((jaccard(&a.set, &b.set) - 1.0 / 7.0).abs() < 1e-9);
//! ```

pub mod config;
pub mod fingerprint;
mod shingles;
mod similarity;

pub use crate::config::{PerceptualConfig, PerceptualError, DEFAULT_SHINGLE_SIZE};
pub use crate::fingerprint::{
    ShingleDigest, ShinglePositions, ShingleSet, Shingles, DIGEST_LEN,
};
pub use crate::shingles::{build_shingles, shingle_set, window_digest};
pub use crate::similarity::{intersection_size, jaccard};
