//! k-token shingling.
//!
//! Every window of `k` consecutive canonical tokens is space-joined and
//! hashed. Windows are order-sensitive: "quick brown fox" and
//! "fox brown quick" are different shingles.

use rayon::prelude::*;
use sha2::{Digest, Sha256};

use crate::config::PerceptualConfig;
use crate::fingerprint::{ShingleDigest, ShinglePositions, ShingleSet, Shingles, DIGEST_LEN};

/// Digest of one window, equal to hashing `window.join(" ")`.
pub fn window_digest<S: AsRef<str>>(window: &[S]) -> ShingleDigest {
    let mut hasher = Sha256::new();
    for (i, token) in window.iter().enumerate() {
        if i > 0 {
            hasher.update(b" ");
        }
        hasher.update(token.as_ref().as_bytes());
    }
    let full = hasher.finalize();
    let mut bytes = [0u8; DIGEST_LEN];
    bytes.copy_from_slice(&full[..DIGEST_LEN]);
    ShingleDigest::from_bytes(bytes)
}

/// Build the shingle set and the digest → start positions map.
///
/// The caller must provide canonical tokens in order. `k == 0` or fewer
/// than `k` tokens yields an empty result.
pub fn build_shingles<S>(tokens: &[S], cfg: &PerceptualConfig) -> Shingles
where
    S: AsRef<str> + Sync,
{
    let k = cfg.k;
    if k == 0 || tokens.len() < k {
        return Shingles::empty(k);
    }

    let digests: Vec<ShingleDigest> = if cfg.parallel_for(tokens.len()) {
        tokens.par_windows(k).map(|w| window_digest(w)).collect()
    } else {
        tokens.windows(k).map(|w| window_digest(w)).collect()
    };

    let mut set = ShingleSet::with_capacity(digests.len());
    let mut positions = ShinglePositions::with_capacity(digests.len());
    for (start, digest) in digests.into_iter().enumerate() {
        set.insert(digest);
        positions.entry(digest).or_default().push(start);
    }

    Shingles { k, set, positions }
}

/// Only the distinct digests, for callers that do not need positions.
pub fn shingle_set<S>(tokens: &[S], k: usize) -> ShingleSet
where
    S: AsRef<str> + Sync,
{
    build_shingles(tokens, &PerceptualConfig::new().with_k(k).with_parallel(false)).set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(k: usize) -> PerceptualConfig {
        PerceptualConfig::new().with_k(k).with_parallel(false)
    }

    #[test]
    fn empty_tokens() {
        let tokens: Vec<&str> = vec![];
        assert!(build_shingles(&tokens, &cfg(3)).is_empty());
    }

    #[test]
    fn k_zero_is_empty_not_error() {
        let shingles = build_shingles(&["a", "b", "c"], &cfg(0));
        assert!(shingles.set.is_empty());
        assert!(shingles.positions.is_empty());
    }

    #[test]
    fn fewer_tokens_than_k() {
        let shingles = build_shingles(&["aa", "bb"], &cfg(3));
        assert!(shingles.set.is_empty());
        assert!(shingles.positions.is_empty());
    }

    #[test]
    fn exact_k_gives_one_shingle() {
        let shingles = build_shingles(&["aa", "bb", "cc"], &cfg(3));
        assert_eq!(shingles.len(), 1);
        assert_eq!(shingles.positions.values().next(), Some(&vec![0]));
    }

    #[test]
    fn count_bounded_by_window_count() {
        let tokens: Vec<String> = (0..40).map(|i| format!("w{}", i % 7)).collect();
        for k in 1..10 {
            let shingles = build_shingles(&tokens, &cfg(k));
            assert!(shingles.len() <= tokens.len().saturating_sub(k) + 1);
            let occurrences: usize = shingles.positions.values().map(Vec::len).sum();
            assert_eq!(occurrences, tokens.len() - k + 1);
        }
    }

    #[test]
    fn repeated_windows_collect_all_positions() {
        let tokens = ["to", "be", "or", "not", "to", "be"];
        let shingles = build_shingles(&tokens, &cfg(2));
        let to_be = window_digest(&["to", "be"]);
        assert_eq!(shingles.positions[&to_be], vec![0, 4]);
        assert_eq!(shingles.len(), 4);
    }

    #[test]
    fn digest_matches_joined_string() {
        let joined = window_digest(&["quick brown fox"]);
        let split = window_digest(&["quick", "brown", "fox"]);
        assert_eq!(joined, split);
    }

    #[test]
    fn order_sensitive() {
        assert_ne!(
            window_digest(&["quick", "brown", "fox"]),
            window_digest(&["fox", "brown", "quick"])
        );
    }

    #[test]
    fn parallel_path_matches_sequential() {
        let tokens: Vec<String> = (0..10_000).map(|i| format!("t{}", i % 313)).collect();
        let sequential = build_shingles(&tokens, &cfg(5));
        let parallel = build_shingles(&tokens, &cfg(5).with_parallel(true));
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn shingle_set_helper() {
        let set = shingle_set(&["the", "quick", "brown", "fox"], 3);
        assert_eq!(set.len(), 2);
    }
}
