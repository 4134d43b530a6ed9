//! Mapping shared shingles back onto token positions.

use std::collections::BTreeSet;

use perceptual::ShinglePositions;

use crate::types::Segment;

/// Token positions covered by shingles present in both documents.
///
/// Every occurrence of a shared digest at start `p` marks `p..p + k` in its
/// own document, so a digest that repeats in one document marks every copy.
pub fn matched_positions(
    a: &ShinglePositions,
    b: &ShinglePositions,
    k: usize,
) -> (BTreeSet<usize>, BTreeSet<usize>) {
    let mut matched_a = BTreeSet::new();
    let mut matched_b = BTreeSet::new();

    for (digest, starts_a) in a {
        let Some(starts_b) = b.get(digest) else {
            continue;
        };
        for &p in starts_a {
            matched_a.extend(p..p + k);
        }
        for &p in starts_b {
            matched_b.extend(p..p + k);
        }
    }

    (matched_a, matched_b)
}

/// Split `tokens` into alternating matched and unmatched runs.
pub fn segments<S: AsRef<str>>(tokens: &[S], matched: &BTreeSet<usize>) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut start = 0;

    while start < tokens.len() {
        let highlighted = matched.contains(&start);
        let mut end = start + 1;
        while end < tokens.len() && matched.contains(&end) == highlighted {
            end += 1;
        }

        let mut text = String::new();
        for (i, token) in tokens[start..end].iter().enumerate() {
            if i > 0 {
                text.push(' ');
            }
            text.push_str(token.as_ref());
        }

        out.push(Segment {
            text,
            highlighted,
            start,
            end,
        });
        start = end;
    }

    out
}
