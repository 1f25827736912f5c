//! Query strategies for pool-based active learning.
//!
//! - [`RandomSampling`]: uniform draw from the unlabeled pool, the reference
//!   strategy and the usual exploration baseline.
//! - [`MixSampling`]: the batch query composition engine, merging several
//!   weighted child strategies into one deduplicated batch.
//! - [`RelevanceFeedbackSampling`]: ranks the pool by the positive-class
//!   score of a trainable binary model.

pub mod mix_sampling;
pub mod random_sampling;
pub mod relevance_feedback;

pub use mix_sampling::MixSampling;
pub use random_sampling::RandomSampling;
pub use relevance_feedback::RelevanceFeedbackSampling;
