//! Random level assignment for new entries

use rand::Rng;

/// Draws entry levels from a geometric distribution with p = 0.5
///
/// A level is in `[1, max_level]`; `P(level = k) = 2^-k` for `k < max_level`,
/// and the remaining tail is folded into `max_level`.
#[derive(Debug)]
pub struct LevelGenerator<R> {
    rng: R,
    max_level: usize,
}

impl<R: Rng> LevelGenerator<R> {
    /// Create a generator bounded by `max_level` (at least 1)
    pub fn new(rng: R, max_level: usize) -> Self {
        Self {
            rng,
            max_level: max_level.max(1),
        }
    }

    /// Draw the level of the next entry
    pub fn next_level(&mut self) -> usize {
        let mut level = 1;
        while level < self.max_level && self.rng.gen_bool(0.5) {
            level += 1;
        }
        level
    }
}

impl<R> LevelGenerator<R> {
    /// Upper bound on drawn levels
    pub fn max_level(&self) -> usize {
        self.max_level
    }
}
