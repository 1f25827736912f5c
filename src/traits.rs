//! Capability contracts for query strategies, models, and labelers.
//!
//! These traits define the seams between the composition engine and its
//! collaborators. Concrete scoring heuristics, trainable models, and human
//! labeling front-ends all live behind them.

use crate::dataset::{Dataset, DatasetRef, Label};
use crate::error::Result;

/// A unit of selection logic bound to exactly one dataset.
///
/// A strategy proposes which unlabeled entry should be labeled next. It may
/// refresh internal state while scoring (for instance refit a model), but it
/// must never resolve labels itself; labeling is the caller's move.
pub trait QueryStrategy {
    /// The dataset this strategy is bound to.
    fn dataset(&self) -> &DatasetRef;

    /// Proposes a single unlabeled entry identifier.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PreguntarError::InsufficientPool`] when the
    /// unlabeled pool is empty.
    fn make_query(&mut self) -> Result<usize>;
}

/// A query strategy that can produce ranked batches.
///
/// Implementing this trait is the batch capability marker: the mix engine
/// only accepts `Box<dyn BatchQueryStrategy>` children, so a strategy
/// without batch support cannot be composed at all.
pub trait BatchQueryStrategy: QueryStrategy {
    /// Proposes exactly `n_ask` distinct unlabeled entry identifiers,
    /// ranked best-first by the strategy's own criterion.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PreguntarError::InsufficientPool`] when the
    /// strategy cannot produce `n_ask` distinct unlabeled identifiers.
    fn make_query_batch(&mut self, n_ask: usize) -> Result<Vec<usize>>;
}

/// A trainable model that produces real-valued per-class decision scores.
///
/// Used by strategies that rank the pool by model output, e.g.
/// [`crate::strategies::RelevanceFeedbackSampling`]. For binary problems the
/// positive class sits at column 1 of [`ContinuousModel::predict_real`].
pub trait ContinuousModel {
    /// Fits the model on the labeled part of the dataset.
    ///
    /// # Errors
    ///
    /// Returns an error when training fails.
    fn train(&mut self, dataset: &Dataset) -> Result<()>;

    /// Per-class decision values for each feature vector, one row per input.
    fn predict_real(&self, features: &[Vec<f32>]) -> Vec<Vec<f32>>;
}

/// The labeling oracle: resolves a feature vector into a ground-truth label.
pub trait Labeler {
    /// Returns the label for the given feature vector.
    ///
    /// # Errors
    ///
    /// Returns an error when the oracle cannot resolve a label.
    fn label(&mut self, features: &[f32]) -> Result<Label>;
}
