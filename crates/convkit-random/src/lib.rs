//! Random source for convkit generators.
//!
//! Generators draw from a [`RandomSource`] passed in by the caller. A
//! source seeded with [`RandomSource::seeded`] replays the same sequence,
//! which is how tests and `--seed` get reproducible output.

use convkit_error::{Result, invalid_option};
use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Most values a generator returns in one call
pub const MAX_COUNT: usize = 1000;

/// Check a requested generator count against `1..=MAX_COUNT`.
pub fn check_count(count: usize) -> Result<()> {
    if (1..=MAX_COUNT).contains(&count) {
        Ok(())
    } else {
        Err(invalid_option(
            "count",
            format!("must be between 1 and {MAX_COUNT}, got {count}"),
        ))
    }
}

/// A pseudo-random number generator owned by one caller.
pub struct RandomSource {
    rng: StdRng,
    seed: Option<u64>,
}

impl RandomSource {
    /// A source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            seed: None,
        }
    }

    /// A reproducible source.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed: Some(seed),
        }
    }

    /// The seed this source was built from, if any
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// A random integer in `min..=max`. The bounds may be given in either
    /// order.
    pub fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }

    /// Like [`range_u32`](Self::range_u32) for signed values.
    pub fn range_i64(&mut self, min: i64, max: i64) -> i64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }

    /// A random index below `len`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len.max(1))
    }

    pub fn bool(&mut self) -> bool {
        self.rng.random()
    }

    pub fn bytes(&mut self, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf);
        buf
    }

    pub fn fill(&mut self, dest: &mut [u8]) {
        self.rng.fill(dest);
    }

    /// Pick a random element from a slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// `n` distinct elements in random order; fewer if the slice is shorter.
    pub fn sample<'a, T>(&mut self, items: &'a [T], n: usize) -> Vec<&'a T> {
        let mut picked: Vec<&T> = items.choose_multiple(&mut self.rng, n).collect();
        picked.shuffle(&mut self.rng);
        picked
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
