//! Fuzzy partial string similarity.
//!
//! Scoring only needs a comparable 0-100 "how well does the shorter string
//! appear inside the longer one" measure, so it goes through the
//! [`Similarity`] trait and any alignment algorithm can be plugged in.

use rapidfuzz::distance::indel;

/// Partial similarity capability on a 0-100 scale.
pub trait Similarity: Send + Sync {
    /// Best alignment of the shorter string as an approximate substring of
    /// the longer one. `100` means an exact substring; either side empty is `0`.
    fn partial_ratio(&self, a: &str, b: &str) -> u8;
}

/// Indel-distance similarity (the ratio used by difflib-style matchers).
///
/// `ratio = 200 * LCS(a, b) / (|a| + |b|)`, computed by `rapidfuzz`;
/// `partial_ratio` slides the shorter string over every same-length window of
/// the longer one and keeps the best.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndelSimilarity;

impl IndelSimilarity {
    pub fn new() -> Self {
        Self
    }
}

impl Similarity for IndelSimilarity {
    fn partial_ratio(&self, a: &str, b: &str) -> u8 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };

        let mut best = 0.0_f64;
        for window in longer.windows(shorter.len()) {
            let r = indel::normalized_similarity(shorter.iter().copied(), window.iter().copied());
            if r > best {
                best = r;
                if best >= 1.0 {
                    break;
                }
            }
        }

        to_percent(best)
    }
}

fn to_percent(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}
