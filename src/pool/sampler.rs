//! Random selection source
//!
//! Draws go through the [`Sampler`] trait so tests and reproducible runs can
//! inject a seeded generator while production uses OS entropy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform sampler over an index set
pub trait Sampler: Send + Sync {
    /// Return `amount` distinct indices from `0..population` in random order.
    ///
    /// Callers guarantee `amount <= population`.
    fn sample_indices(&mut self, population: usize, amount: usize) -> Vec<usize>;
}

/// Sampler backed by any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSampler<R = StdRng> {
    rng: R,
}

impl RngSampler<StdRng> {
    /// Deterministic sampler for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Sampler seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded when a seed is configured, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> RngSampler<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send + Sync> Sampler for RngSampler<R> {
    fn sample_indices(&mut self, population: usize, amount: usize) -> Vec<usize> {
        rand::seq::index::sample(&mut self.rng, population, amount).into_vec()
    }
}
