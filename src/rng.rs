//! Seedable RNG with weighted choice
//!
//! All randomness in the engines flows through [`GameRng`] so that a session
//! is fully reproducible from its seed. Pattern and piece generators use the
//! cumulative-weight draw; puzzle builders use the Fisher-Yates shuffle.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Deterministic RNG carried inside engine state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRng {
    /// Seed this generator was created from (kept for reproduction/logging)
    pub seed: u64,
    rng: Pcg32,
}

impl GameRng {
    /// Create from an explicit seed (tests, replays)
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Create from OS entropy (live sessions)
    pub fn from_entropy() -> Self {
        let seed = rand::rng().random();
        Self::seeded(seed)
    }

    /// Uniform f32 in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        self.rng.random()
    }

    /// Uniform f32 in [lo, hi)
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.rng.random_range(lo..hi)
    }

    /// Uniform index in [0, n); returns 0 for an empty range
    pub fn range_usize(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.random_range(0..n)
    }

    /// True with probability p
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// In-place Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        slice.shuffle(&mut self.rng);
    }

    /// Uniform element reference, None for an empty slice
    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            Some(&slice[self.range_usize(slice.len())])
        }
    }

    /// Cumulative-weight draw: returns an index with probability
    /// `weights[i] / sum(weights)`. Zero-weight entries are never chosen.
    /// Degenerate input (empty slice or non-positive total) yields index 0.
    pub fn weighted_pick(&mut self, weights: &[f32]) -> usize {
        let total: f32 = weights.iter().filter(|w| **w > 0.0).sum();
        if weights.is_empty() || total <= 0.0 {
            return 0;
        }
        let mut roll = self.range_f32(0.0, total);
        for (i, &w) in weights.iter().enumerate() {
            if w <= 0.0 {
                continue;
            }
            if roll < w {
                return i;
            }
            roll -= w;
        }
        // Float rounding can leave a sliver past the last positive weight
        weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_determinism() {
        let mut a = GameRng::seeded(12345);
        let mut b = GameRng::seeded(12345);
        for _ in 0..100 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = GameRng::seeded(1);
        let mut b = GameRng::seeded(2);
        let same = (0..20).all(|_| a.next_f32().to_bits() == b.next_f32().to_bits());
        assert!(!same);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::seeded(7);
        let mut values: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<u32>>());
    }

    #[test]
    fn test_weighted_pick_skips_zero_weights() {
        let mut rng = GameRng::seeded(99);
        let weights = [0.0, 3.0, 0.0, 1.0];
        for _ in 0..200 {
            let idx = rng.weighted_pick(&weights);
            assert!(idx == 1 || idx == 3, "picked zero-weight index {idx}");
        }
    }

    #[test]
    fn test_weighted_pick_degenerate_input() {
        let mut rng = GameRng::seeded(5);
        assert_eq!(rng.weighted_pick(&[]), 0);
        assert_eq!(rng.weighted_pick(&[0.0, 0.0]), 0);
    }

    #[test]
    fn test_weighted_pick_roughly_proportional() {
        let mut rng = GameRng::seeded(42);
        let weights = [1.0, 9.0];
        let mut hits = [0u32; 2];
        for _ in 0..2000 {
            hits[rng.weighted_pick(&weights)] += 1;
        }
        // Expect ~200 / ~1800 with generous slack
        assert!(hits[0] > 80 && hits[0] < 400, "skewed split: {hits:?}");
    }

    #[test]
    fn test_range_usize_empty() {
        let mut rng = GameRng::seeded(3);
        assert_eq!(rng.range_usize(0), 0);
    }

    #[test]
    fn test_chance_extremes() {
        let mut rng = GameRng::seeded(11);
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.1));
    }
}
