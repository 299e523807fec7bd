//! RNG module - deterministic candy generation
//!
//! A small LCG keeps every board reproducible from a seed (tests, benches,
//! replaying a reported session). [`CandySource`] draws candy kinds from the
//! first `kinds` entries of [`CandyKind::ALL`].

use crate::types::{CandyKind, GRID_CELLS};

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // Low LCG bits have short periods; scale from the high bits instead of `%`.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// Draws candy kinds for board generation and refills.
#[derive(Debug, Clone)]
pub struct CandySource {
    rng: SimpleRng,
    kinds: u8,
}

impl CandySource {
    /// `kinds` is clamped to `3..=6`; fewer than three kinds could never settle.
    pub fn new(seed: u32, kinds: u8) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            kinds: kinds.clamp(3, CandyKind::COUNT as u8),
        }
    }

    pub fn kinds(&self) -> u8 {
        self.kinds
    }

    /// Draw the next candy kind.
    pub fn next_kind(&mut self) -> CandyKind {
        let idx = self.rng.next_range(self.kinds as u32) as usize;
        CandyKind::ALL[idx]
    }

    /// Pick `count` distinct cell indices in `[0, GRID_CELLS)`.
    pub fn pick_cells(&mut self, count: usize) -> Vec<usize> {
        let mut all: Vec<usize> = (0..GRID_CELLS).collect();
        self.rng.shuffle(&mut all);
        all.truncate(count.min(GRID_CELLS));
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);

        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_next_range_stays_in_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(6) < 6);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_candy_source_covers_all_kinds() {
        let mut source = CandySource::new(99, 6);
        let mut seen = [false; 6];
        for _ in 0..500 {
            seen[source.next_kind().index()] = true;
        }
        assert!(seen.iter().all(|s| *s), "every kind should eventually appear");
    }

    #[test]
    fn test_candy_source_respects_kind_count() {
        let mut source = CandySource::new(3, 3);
        for _ in 0..200 {
            assert!(source.next_kind().index() < 3);
        }
        // Clamped into 3..=6.
        assert_eq!(CandySource::new(1, 1).kinds(), 3);
        assert_eq!(CandySource::new(1, 9).kinds(), 6);
    }

    #[test]
    fn test_pick_cells_distinct() {
        let mut source = CandySource::new(5, 6);
        let mut cells = source.pick_cells(8);
        assert_eq!(cells.len(), 8);
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), 8);
    }
}
