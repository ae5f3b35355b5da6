//! Injected randomness used by systems and the world.

use std::{cmp::Ordering, fmt};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed values.
///
/// Everything that draws random numbers receives one of these at construction
/// so tests can script exact sequences.
pub trait RandomSource: fmt::Debug {
    /// Returns a value in `low..high`. Returns `low` when the range is empty.
    fn uniform(&mut self, low: f32, high: f32) -> f32;

    /// Returns an integer in `low..=high`. Returns `low` when the range is empty.
    fn integer(&mut self, low: u32, high: u32) -> u32;
}

/// Deterministic [`RandomSource`] backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a source whose sequence is fully determined by `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        if high.partial_cmp(&low) != Some(Ordering::Greater) {
            return low;
        }
        self.rng.gen_range(low..high)
    }

    fn integer(&mut self, low: u32, high: u32) -> u32 {
        if high <= low {
            return low;
        }
        self.rng.gen_range(low..=high)
    }
}
