//! Preguntar: pool-based active learning in pure Rust.
//!
//! Preguntar selects which unlabeled entries of a dataset should be sent to
//! a labeling oracle next, so labeling effort goes where it buys the most
//! model improvement. At its center sits the mix composition engine, which
//! merges several weighted query strategies into a single deduplicated
//! batch of exactly the requested size.
//!
//! # Quick Start
//!
//! ```
//! use preguntar::prelude::*;
//!
//! // Ten entries, none labeled yet.
//! let features: Vec<Vec<f32>> = (0..10).map(|i| vec![i as f32]).collect();
//! let dataset = DatasetRef::new(
//!     Dataset::new(features, vec![None; 10]).expect("lengths match"),
//! );
//!
//! // Mix two strategies 70/30.
//! let strategies: Vec<(Box<dyn BatchQueryStrategy>, f64)> = vec![
//!     (Box::new(RandomSampling::new(dataset.clone()).with_seed(7)), 0.7),
//!     (Box::new(RandomSampling::new(dataset.clone()).with_seed(11)), 0.3),
//! ];
//! let mut mix = MixSampling::weighted(dataset.clone(), strategies)
//!     .expect("valid configuration")
//!     .with_seed(42);
//!
//! // Ask which entry to label next; resolving it shrinks the pool.
//! let id = mix.make_query().expect("pool is non-empty");
//! dataset.update(id, 1).expect("entry exists");
//! assert_eq!(dataset.len_unlabeled(), 9);
//! ```
//!
//! # Modules
//!
//! - [`dataset`]: partially labeled datasets and the shared [`DatasetRef`] handle
//! - [`strategies`]: query strategies, including the [`MixSampling`] composition engine
//! - [`labelers`]: labeling oracles
//! - [`random_state`]: seedable random number source
//! - [`traits`]: capability contracts for strategies, models, and labelers

pub mod dataset;
pub mod error;
pub mod labelers;
pub mod prelude;
pub mod random_state;
pub mod strategies;
pub mod traits;

pub use dataset::{Dataset, DatasetRef, Entry, Label};
pub use error::{PreguntarError, Result};
pub use strategies::{MixSampling, RandomSampling, RelevanceFeedbackSampling};
pub use traits::{BatchQueryStrategy, ContinuousModel, Labeler, QueryStrategy};
