//! Seedable random number source.
//!
//! Every component that needs randomness owns its own [`RandomState`];
//! nothing in the crate reaches for a global generator. Two sources seeded
//! identically produce identical draw sequences, which is what makes query
//! composition reproducible end to end.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::error::{PreguntarError, Result};

/// Deterministic, seedable pseudo-random generator.
///
/// # Examples
///
/// ```
/// use preguntar::random_state::RandomState;
///
/// let population = vec![10, 20, 30, 40, 50];
/// let mut a = RandomState::seeded(42);
/// let mut b = RandomState::seeded(42);
/// assert_eq!(
///     a.choice(&population, 3).expect("pool is large enough"),
///     b.choice(&population, 3).expect("pool is large enough"),
/// );
/// ```
#[derive(Debug)]
pub struct RandomState {
    rng: StdRng,
}

impl RandomState {
    /// Entropy-seeded source; draws are not reproducible.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded source; draws are reproducible.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws `size` distinct values uniformly from `population`, without
    /// replacement.
    ///
    /// # Errors
    ///
    /// Returns [`PreguntarError::InsufficientPool`] when `size` exceeds the
    /// population.
    pub fn choice(&mut self, population: &[usize], size: usize) -> Result<Vec<usize>> {
        if size > population.len() {
            return Err(PreguntarError::InsufficientPool {
                requested: size,
                available: population.len(),
            });
        }
        let mut pool = population.to_vec();
        pool.shuffle(&mut self.rng);
        pool.truncate(size);
        Ok(pool)
    }

    /// Draws `size` indices into `weights` with replacement, each index
    /// sampled with probability proportional to its weight.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the weights cannot form a sampling
    /// distribution (empty, negative, or all zero).
    pub fn choice_weighted(&mut self, weights: &[f64], size: usize) -> Result<Vec<usize>> {
        let dist = WeightedIndex::new(weights).map_err(|e| {
            PreguntarError::configuration(format!("invalid sampling weights: {e}"))
        })?;
        Ok((0..size).map(|_| dist.sample(&mut self.rng)).collect())
    }
}

impl Default for RandomState {
    fn default() -> Self {
        Self::new()
    }
}
