//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use preguntar::prelude::*;
//! ```

pub use crate::dataset::{Dataset, DatasetRef, Entry, Label};
pub use crate::error::{PreguntarError, Result};
pub use crate::labelers::IdealLabeler;
pub use crate::random_state::RandomState;
pub use crate::strategies::{MixSampling, RandomSampling, RelevanceFeedbackSampling};
pub use crate::traits::{BatchQueryStrategy, ContinuousModel, Labeler, QueryStrategy};
