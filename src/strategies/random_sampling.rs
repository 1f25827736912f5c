//! Uniform random sampling from the unlabeled pool.

use crate::dataset::DatasetRef;
use crate::error::Result;
use crate::random_state::RandomState;
use crate::traits::{BatchQueryStrategy, QueryStrategy};

/// Random query strategy.
///
/// Draws entries uniformly at random, without replacement, from the current
/// unlabeled pool. Useful standalone as an exploration baseline and as a
/// building block inside a [`crate::strategies::MixSampling`] mix.
///
/// # Examples
///
/// ```
/// use preguntar::prelude::*;
///
/// let features: Vec<Vec<f32>> = (0..8).map(|i| vec![i as f32]).collect();
/// let dataset = DatasetRef::new(
///     Dataset::new(features, vec![None; 8]).expect("lengths match"),
/// );
///
/// let mut qs = RandomSampling::new(dataset).with_seed(42);
/// let batch = qs.make_query_batch(3).expect("pool is large enough");
/// assert_eq!(batch.len(), 3);
/// ```
#[derive(Debug)]
pub struct RandomSampling {
    dataset: DatasetRef,
    random_state: RandomState,
}

impl RandomSampling {
    /// Binds the strategy to a dataset with a non-reproducible source.
    #[must_use]
    pub fn new(dataset: DatasetRef) -> Self {
        Self {
            dataset,
            random_state: RandomState::new(),
        }
    }

    /// Set random seed for reproducibility.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_state = RandomState::seeded(seed);
        self
    }
}

impl QueryStrategy for RandomSampling {
    fn dataset(&self) -> &DatasetRef {
        &self.dataset
    }

    fn make_query(&mut self) -> Result<usize> {
        let mut batch = self.make_query_batch(1)?;
        batch.pop().ok_or_else(|| "batch query returned an empty batch".into())
    }
}

impl BatchQueryStrategy for RandomSampling {
    fn make_query_batch(&mut self, n_ask: usize) -> Result<Vec<usize>> {
        let pool = self.dataset.get_unlabeled_idx();
        self.random_state.choice(&pool, n_ask)
    }
}
