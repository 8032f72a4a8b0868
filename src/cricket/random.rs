//! Sources for the computer's pick.
//!
//! Every source must be uniform over the requested range. The rand-backed
//! sources go through `random_range`, which samples without modulo bias.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RandomSource {
    /// Uniform integer in `low..=high`.
    fn uniform_int(&mut self, low: u8, high: u8) -> u8;
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn uniform_int(&mut self, low: u8, high: u8) -> u8 {
        (**self).uniform_int(low, high)
    }
}

/// Thread-local OS-seeded generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform_int(&mut self, low: u8, high: u8) -> u8 {
        rand::rng().random_range(low..=high)
    }
}

/// Reproducible generator for `--seed` runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRandom {
    fn uniform_int(&mut self, low: u8, high: u8) -> u8 {
        self.rng.random_range(low..=high)
    }
}

/// Test double: replays a fixed list of draws, wrapping around when it
/// runs out. Values are clamped into the requested range, so it is not
/// uniform and must not back a real match; use [`ThreadRandom`] or
/// [`SeededRandom`] there.
#[derive(Debug, Clone)]
pub struct SequenceRandom {
    draws: Vec<u8>,
    next: usize,
}

impl SequenceRandom {
    pub fn new(draws: impl Into<Vec<u8>>) -> Self {
        Self { draws: draws.into(), next: 0 }
    }
}

impl RandomSource for SequenceRandom {
    fn uniform_int(&mut self, low: u8, high: u8) -> u8 {
        if self.draws.is_empty() {
            return low;
        }
        let value = self.draws[self.next % self.draws.len()];
        self.next += 1;
        value.clamp(low, high)
    }
}
