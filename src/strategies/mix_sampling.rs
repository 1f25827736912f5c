//! Batch query composition: merge weighted child strategies into one batch.
//!
//! [`MixSampling`] owns a set of child strategies sharing one dataset and a
//! weight per child. A batch request is satisfied over one or more rounds:
//! every round asks each child for a fresh ranked batch of the outstanding
//! size, apportions picks across children by weight, deduplicates, and
//! shrinks the outstanding need by the net-new contribution. Apportionment
//! is integral (`floor(weight * need)` per child) whenever some child's
//! share reaches a whole entry, and falls back to weighted sampling with
//! replacement when every share is fractional.
//!
//! Children need not avoid each other's suggestions, or even their own from
//! earlier rounds; the engine's deduplication is the authoritative
//! uniqueness guard. A round that contributes nothing is retried once, then
//! reported as [`PreguntarError::StalledComposition`] rather than looping
//! forever.

use std::collections::HashSet;

use crate::dataset::DatasetRef;
use crate::error::{PreguntarError, Result};
use crate::random_state::RandomState;
use crate::traits::{BatchQueryStrategy, QueryStrategy};

/// Weights must sum to 1.0 within this tolerance.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Mix query strategy: the batch query composition engine.
///
/// Combines child strategies into a single deduplicated batch, honoring
/// per-child weights. A single-child mix (weight 1.0) passes its child's
/// batches through unchanged. `MixSampling` itself implements
/// [`BatchQueryStrategy`], so mixes nest.
///
/// # Examples
///
/// ```
/// use preguntar::prelude::*;
///
/// let features: Vec<Vec<f32>> = (0..20).map(|i| vec![i as f32]).collect();
/// let dataset = DatasetRef::new(
///     Dataset::new(features, vec![None; 20]).expect("lengths match"),
/// );
///
/// let strategies: Vec<(Box<dyn BatchQueryStrategy>, f64)> = vec![
///     (Box::new(RandomSampling::new(dataset.clone()).with_seed(7)), 0.7),
///     (Box::new(RandomSampling::new(dataset.clone()).with_seed(11)), 0.3),
/// ];
/// let mut mix = MixSampling::weighted(dataset.clone(), strategies)
///     .expect("valid configuration")
///     .with_seed(42);
///
/// let id = mix.make_query().expect("pool is non-empty");
/// assert!(dataset.get_unlabeled_idx().contains(&id));
/// ```
pub struct MixSampling {
    dataset: DatasetRef,
    strategies: Vec<Box<dyn BatchQueryStrategy>>,
    weights: Vec<f64>,
    random_state: RandomState,
}

impl MixSampling {
    /// Builds a mix with equal weights across the given strategies.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the strategy set is empty or a
    /// child is bound to a different dataset instance.
    pub fn uniform(
        dataset: DatasetRef,
        strategies: Vec<Box<dyn BatchQueryStrategy>>,
    ) -> Result<Self> {
        if strategies.is_empty() {
            return Err(PreguntarError::configuration("query strategy set is empty"));
        }
        let weight = 1.0 / strategies.len() as f64;
        let weights = vec![weight; strategies.len()];
        Self::validated(dataset, strategies, weights)
    }

    /// Builds a mix with an explicit weight per strategy.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the strategy set is empty, a
    /// child is bound to a different dataset instance, a weight falls
    /// outside (0, 1], or the weights do not sum to 1.0 within 1e-9.
    pub fn weighted(
        dataset: DatasetRef,
        strategies: Vec<(Box<dyn BatchQueryStrategy>, f64)>,
    ) -> Result<Self> {
        if strategies.is_empty() {
            return Err(PreguntarError::configuration("query strategy set is empty"));
        }
        let (strategies, weights) = strategies.into_iter().unzip();
        Self::validated(dataset, strategies, weights)
    }

    fn validated(
        dataset: DatasetRef,
        strategies: Vec<Box<dyn BatchQueryStrategy>>,
        weights: Vec<f64>,
    ) -> Result<Self> {
        for qs in &strategies {
            if *qs.dataset() != dataset {
                return Err(PreguntarError::configuration(
                    "child strategies must share the mix's dataset instance",
                ));
            }
        }
        for &weight in &weights {
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(PreguntarError::configuration(format!(
                    "strategy weight {weight} is outside (0, 1]"
                )));
            }
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(PreguntarError::configuration(format!(
                "strategy weights must sum to 1.0, got {sum}"
            )));
        }
        Ok(Self {
            dataset,
            strategies,
            weights,
            random_state: RandomState::new(),
        })
    }

    /// Set random seed for reproducibility.
    ///
    /// The seed governs the engine's own stochastic apportionment; child
    /// strategies carry their own sources.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_state = RandomState::seeded(seed);
        self
    }

    /// The weight of each child strategy, in child order.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of child strategies.
    #[must_use]
    pub fn n_strategies(&self) -> usize {
        self.strategies.len()
    }

    /// One composition round: pick identifiers from the candidate pools
    /// according to weight, preserving each pool's rank order.
    fn apportion(&mut self, candidates: &mut [Vec<usize>], n_need: usize) -> Result<Vec<usize>> {
        let integral = self
            .weights
            .iter()
            .any(|weight| weight * n_need as f64 >= 1.0);

        let mut round = Vec::with_capacity(n_need);
        if integral {
            for (pool, &weight) in candidates.iter_mut().zip(&self.weights) {
                let share = (weight * n_need as f64).floor() as usize;
                round.extend(pool.drain(..share.min(pool.len())));
            }
        } else {
            let assignments = self.random_state.choice_weighted(&self.weights, n_need)?;
            let mut counts = vec![0usize; self.strategies.len()];
            for child in assignments {
                counts[child] += 1;
            }
            for (pool, &count) in candidates.iter_mut().zip(&counts) {
                round.extend(pool.drain(..count.min(pool.len())));
            }
        }
        Ok(round)
    }
}

impl QueryStrategy for MixSampling {
    fn dataset(&self) -> &DatasetRef {
        &self.dataset
    }

    fn make_query(&mut self) -> Result<usize> {
        let mut batch = self.make_query_batch(1)?;
        batch.pop().ok_or_else(|| "batch query returned an empty batch".into())
    }
}

impl BatchQueryStrategy for MixSampling {
    fn make_query_batch(&mut self, n_ask: usize) -> Result<Vec<usize>> {
        let available = self.dataset.len_unlabeled();
        if n_ask > available {
            return Err(PreguntarError::InsufficientPool {
                requested: n_ask,
                available,
            });
        }

        let mut picked = Vec::with_capacity(n_ask);
        let mut picked_set: HashSet<usize> = HashSet::with_capacity(n_ask);
        let mut n_need = n_ask;
        let mut retried = false;

        while n_need > 0 {
            let mut candidates = Vec::with_capacity(self.strategies.len());
            for qs in &mut self.strategies {
                candidates.push(qs.make_query_batch(n_need)?);
            }

            let round = self.apportion(&mut candidates, n_need)?;

            let mut progressed = 0;
            for id in round {
                if picked_set.insert(id) {
                    picked.push(id);
                    progressed += 1;
                }
            }
            n_need -= progressed;

            if progressed == 0 {
                if retried {
                    return Err(PreguntarError::StalledComposition { outstanding: n_need });
                }
                retried = true;
            } else {
                retried = false;
            }
        }

        Ok(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::strategies::RandomSampling;
    use std::cell::Cell;
    use std::rc::Rc;

    fn pool_of(n: usize) -> DatasetRef {
        let features = (0..n).map(|i| vec![i as f32]).collect();
        DatasetRef::new(Dataset::new(features, vec![None; n]).expect("valid dataset"))
    }

    // Deterministic child: proposes its fixed ranking, skipping labeled
    // entries, fresh on every call.
    struct FixedOrder {
        dataset: DatasetRef,
        ranking: Vec<usize>,
        calls: Rc<Cell<usize>>,
    }

    impl FixedOrder {
        fn new(dataset: DatasetRef, ranking: Vec<usize>) -> Self {
            Self {
                dataset,
                ranking,
                calls: Rc::new(Cell::new(0)),
            }
        }

        fn call_counter(&self) -> Rc<Cell<usize>> {
            Rc::clone(&self.calls)
        }
    }

    impl QueryStrategy for FixedOrder {
        fn dataset(&self) -> &DatasetRef {
            &self.dataset
        }

        fn make_query(&mut self) -> Result<usize> {
            let mut batch = self.make_query_batch(1)?;
            batch.pop().ok_or_else(|| "batch query returned an empty batch".into())
        }
    }

    impl BatchQueryStrategy for FixedOrder {
        fn make_query_batch(&mut self, n_ask: usize) -> Result<Vec<usize>> {
            self.calls.set(self.calls.get() + 1);
            let unlabeled: HashSet<usize> = self.dataset.get_unlabeled_idx().into_iter().collect();
            let picks: Vec<usize> = self
                .ranking
                .iter()
                .copied()
                .filter(|id| unlabeled.contains(id))
                .take(n_ask)
                .collect();
            if picks.len() < n_ask {
                return Err(PreguntarError::InsufficientPool {
                    requested: n_ask,
                    available: picks.len(),
                });
            }
            Ok(picks)
        }
    }

    // Misbehaving child: returns the same identifier over and over.
    struct Echo {
        dataset: DatasetRef,
        id: usize,
    }

    impl QueryStrategy for Echo {
        fn dataset(&self) -> &DatasetRef {
            &self.dataset
        }

        fn make_query(&mut self) -> Result<usize> {
            Ok(self.id)
        }
    }

    impl BatchQueryStrategy for Echo {
        fn make_query_batch(&mut self, n_ask: usize) -> Result<Vec<usize>> {
            Ok(vec![self.id; n_ask])
        }
    }

    // Stateful child: rotates through its identifier list across calls.
    struct Cycler {
        dataset: DatasetRef,
        ids: Vec<usize>,
        cursor: usize,
    }

    impl Cycler {
        fn new(dataset: DatasetRef, ids: Vec<usize>) -> Self {
            Self {
                dataset,
                ids,
                cursor: 0,
            }
        }
    }

    impl QueryStrategy for Cycler {
        fn dataset(&self) -> &DatasetRef {
            &self.dataset
        }

        fn make_query(&mut self) -> Result<usize> {
            let mut batch = self.make_query_batch(1)?;
            batch.pop().ok_or_else(|| "batch query returned an empty batch".into())
        }
    }

    impl BatchQueryStrategy for Cycler {
        fn make_query_batch(&mut self, n_ask: usize) -> Result<Vec<usize>> {
            if n_ask > self.ids.len() {
                return Err(PreguntarError::InsufficientPool {
                    requested: n_ask,
                    available: self.ids.len(),
                });
            }
            let batch = (0..n_ask)
                .map(|offset| self.ids[(self.cursor + offset) % self.ids.len()])
                .collect();
            self.cursor += n_ask;
            Ok(batch)
        }
    }

    #[test]
    fn test_uniform_weights_split_equally() {
        let dataset = pool_of(10);
        let strategies: Vec<Box<dyn BatchQueryStrategy>> = vec![
            Box::new(FixedOrder::new(dataset.clone(), (0..10).collect())),
            Box::new(FixedOrder::new(dataset.clone(), (0..10).rev().collect())),
            Box::new(RandomSampling::new(dataset.clone()).with_seed(1)),
        ];
        let mix = MixSampling::uniform(dataset, strategies).expect("valid configuration");
        assert_eq!(mix.n_strategies(), 3);
        let sum: f64 = mix.weights().iter().sum();
        assert!((sum - 1.0).abs() < WEIGHT_SUM_TOLERANCE);
        for &weight in mix.weights() {
            assert!((weight - 1.0 / 3.0).abs() < WEIGHT_SUM_TOLERANCE);
        }
    }

    #[test]
    fn test_empty_strategy_set_rejected() {
        let dataset = pool_of(5);
        let uniform = MixSampling::uniform(dataset.clone(), Vec::new());
        assert!(matches!(
            uniform,
            Err(PreguntarError::Configuration { .. })
        ));
        let weighted = MixSampling::weighted(dataset, Vec::new());
        assert!(matches!(
            weighted,
            Err(PreguntarError::Configuration { .. })
        ));
    }

    #[test]
    fn test_weights_not_summing_to_one_rejected() {
        let dataset = pool_of(5);
        let strategies: Vec<(Box<dyn BatchQueryStrategy>, f64)> = vec![
            (Box::new(FixedOrder::new(dataset.clone(), vec![0, 1])), 0.5),
            (Box::new(FixedOrder::new(dataset.clone(), vec![2, 3])), 0.4),
        ];
        let result = MixSampling::weighted(dataset, strategies);
        assert!(matches!(result, Err(PreguntarError::Configuration { .. })));
    }

    #[test]
    fn test_zero_weight_rejected() {
        let dataset = pool_of(5);
        let strategies: Vec<(Box<dyn BatchQueryStrategy>, f64)> = vec![
            (Box::new(FixedOrder::new(dataset.clone(), vec![0, 1])), 0.0),
            (Box::new(FixedOrder::new(dataset.clone(), vec![2, 3])), 1.0),
        ];
        let result = MixSampling::weighted(dataset, strategies);
        assert!(matches!(result, Err(PreguntarError::Configuration { .. })));
    }

    #[test]
    fn test_weight_above_one_rejected() {
        let dataset = pool_of(5);
        let strategies: Vec<(Box<dyn BatchQueryStrategy>, f64)> =
            vec![(Box::new(FixedOrder::new(dataset.clone(), vec![0, 1])), 1.5)];
        let result = MixSampling::weighted(dataset, strategies);
        assert!(matches!(result, Err(PreguntarError::Configuration { .. })));
    }

    #[test]
    fn test_dataset_mismatch_rejected() {
        let dataset = pool_of(5);
        let other = pool_of(5);
        let strategies: Vec<Box<dyn BatchQueryStrategy>> =
            vec![Box::new(FixedOrder::new(other, vec![0, 1, 2]))];
        let result = MixSampling::uniform(dataset, strategies);
        assert!(matches!(result, Err(PreguntarError::Configuration { .. })));
    }

    #[test]
    fn test_weight_fidelity_deterministic_apportionment() {
        let dataset = pool_of(20);
        let strategies: Vec<(Box<dyn BatchQueryStrategy>, f64)> = vec![
            (
                Box::new(FixedOrder::new(dataset.clone(), (0..10).collect())),
                0.7,
            ),
            (
                Box::new(FixedOrder::new(dataset.clone(), (10..20).collect())),
                0.3,
            ),
        ];
        let mut mix = MixSampling::weighted(dataset, strategies)
            .expect("valid configuration")
            .with_seed(0);

        let batch = mix.make_query_batch(10).expect("pool is large enough");
        assert_eq!(batch, vec![0, 1, 2, 3, 4, 5, 6, 10, 11, 12]);
    }

    #[test]
    fn test_overlapping_top_suggestion_counted_once() {
        let dataset = pool_of(50);
        let strategies: Vec<Box<dyn BatchQueryStrategy>> = vec![
            Box::new(FixedOrder::new(dataset.clone(), vec![42, 0, 1, 2])),
            Box::new(FixedOrder::new(dataset.clone(), vec![42, 3, 4, 5])),
        ];
        let mut mix = MixSampling::uniform(dataset, strategies)
            .expect("valid configuration")
            .with_seed(17);

        assert_eq!(mix.make_query().expect("pool is non-empty"), 42);
    }

    #[test]
    fn test_single_strategy_degenerates_to_passthrough() {
        let dataset = pool_of(30);
        let child: Vec<Box<dyn BatchQueryStrategy>> =
            vec![Box::new(RandomSampling::new(dataset.clone()).with_seed(5))];
        let mut mix = MixSampling::uniform(dataset.clone(), child)
            .expect("valid configuration")
            .with_seed(0);
        let mut standalone = RandomSampling::new(dataset).with_seed(5);

        for n_ask in [1, 4, 9] {
            assert_eq!(
                mix.make_query_batch(n_ask).expect("pool is large enough"),
                standalone
                    .make_query_batch(n_ask)
                    .expect("pool is large enough"),
            );
        }
    }

    #[test]
    fn test_insufficient_pool_fails_before_querying_children() {
        let dataset = pool_of(3);
        let child = FixedOrder::new(dataset.clone(), vec![0, 1, 2]);
        let calls = child.call_counter();
        let strategies: Vec<Box<dyn BatchQueryStrategy>> = vec![Box::new(child)];
        let mut mix = MixSampling::uniform(dataset, strategies).expect("valid configuration");

        let result = mix.make_query_batch(4);
        assert!(matches!(
            result,
            Err(PreguntarError::InsufficientPool {
                requested: 4,
                available: 3,
            })
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_stalled_composition_detected() {
        let dataset = pool_of(5);
        let strategies: Vec<Box<dyn BatchQueryStrategy>> = vec![Box::new(Echo {
            dataset: dataset.clone(),
            id: 0,
        })];
        let mut mix = MixSampling::uniform(dataset, strategies).expect("valid configuration");

        let result = mix.make_query_batch(2);
        assert!(matches!(
            result,
            Err(PreguntarError::StalledComposition { outstanding: 1 })
        ));
    }

    #[test]
    fn test_zero_progress_round_recovers_after_retry() {
        // Both children cycle through the same five identifiers, so a late
        // round repeats consumed candidates and only the retry advances far
        // enough to find a fresh one.
        let dataset = pool_of(5);
        let strategies: Vec<Box<dyn BatchQueryStrategy>> = vec![
            Box::new(Cycler::new(dataset.clone(), (0..5).collect())),
            Box::new(Cycler::new(dataset.clone(), (0..5).collect())),
        ];
        let mut mix = MixSampling::uniform(dataset, strategies)
            .expect("valid configuration")
            .with_seed(3);

        let batch = mix.make_query_batch(4).expect("cyclers eventually advance");
        assert_eq!(batch, vec![0, 1, 4, 2]);
    }

    #[test]
    fn test_stochastic_branch_respects_weights() {
        let dataset = pool_of(400);
        let n_trials = 2000;
        let mut block_counts = [0usize; 4];
        for seed in 0..n_trials {
            let strategies: Vec<(Box<dyn BatchQueryStrategy>, f64)> = vec![
                (
                    Box::new(FixedOrder::new(dataset.clone(), (0..10).collect())),
                    0.1,
                ),
                (
                    Box::new(FixedOrder::new(dataset.clone(), (100..110).collect())),
                    0.1,
                ),
                (
                    Box::new(FixedOrder::new(dataset.clone(), (200..210).collect())),
                    0.1,
                ),
                (
                    Box::new(FixedOrder::new(dataset.clone(), (300..310).collect())),
                    0.7,
                ),
            ];
            let mut mix = MixSampling::weighted(dataset.clone(), strategies)
                .expect("valid configuration")
                .with_seed(seed);
            let id = mix.make_query().expect("pool is non-empty");
            block_counts[id / 100] += 1;
        }

        let expected = [0.1, 0.1, 0.1, 0.7];
        for (count, expected) in block_counts.iter().zip(expected) {
            let observed = *count as f64 / n_trials as f64;
            assert!(
                (observed - expected).abs() < 0.05,
                "observed frequency {observed} too far from expected {expected}"
            );
        }
    }

    #[test]
    fn test_stochastic_branch_is_reproducible() {
        let dataset = pool_of(40);
        let build = |engine_seed: u64| {
            let strategies: Vec<Box<dyn BatchQueryStrategy>> = vec![
                Box::new(FixedOrder::new(dataset.clone(), (0..10).collect())),
                Box::new(FixedOrder::new(dataset.clone(), (10..20).collect())),
                Box::new(FixedOrder::new(dataset.clone(), (20..30).collect())),
                Box::new(FixedOrder::new(dataset.clone(), (30..40).collect())),
            ];
            MixSampling::uniform(dataset.clone(), strategies)
                .expect("valid configuration")
                .with_seed(engine_seed)
        };

        let mut a = build(42);
        let mut b = build(42);
        for _ in 0..10 {
            assert_eq!(
                a.make_query_batch(2).expect("pool is large enough"),
                b.make_query_batch(2).expect("pool is large enough"),
            );
        }
    }

    #[test]
    fn test_batch_exact_size_distinct_and_from_pool() {
        let dataset = pool_of(100);
        let strategies: Vec<Box<dyn BatchQueryStrategy>> = vec![
            Box::new(FixedOrder::new(dataset.clone(), (0..50).collect())),
            Box::new(FixedOrder::new(dataset.clone(), (50..100).rev().collect())),
        ];
        let mut mix = MixSampling::uniform(dataset.clone(), strategies)
            .expect("valid configuration")
            .with_seed(7);

        let batch = mix.make_query_batch(8).expect("pool is large enough");
        assert_eq!(batch.len(), 8);
        let unique: HashSet<usize> = batch.iter().copied().collect();
        assert_eq!(unique.len(), 8);
        let pool: HashSet<usize> = dataset.get_unlabeled_idx().into_iter().collect();
        assert!(batch.iter().all(|id| pool.contains(id)));
    }

    #[test]
    fn test_scalar_query_returns_pool_member() {
        let dataset = pool_of(6);
        let strategies: Vec<Box<dyn BatchQueryStrategy>> =
            vec![Box::new(RandomSampling::new(dataset.clone()).with_seed(1))];
        let mut mix = MixSampling::uniform(dataset.clone(), strategies)
            .expect("valid configuration");

        let id = mix.make_query().expect("pool is non-empty");
        assert!(dataset.get_unlabeled_idx().contains(&id));
    }
}
