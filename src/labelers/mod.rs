//! Labeling oracles.
//!
//! A labeler resolves a queried entry into a ground-truth label. The only
//! built-in implementation is [`IdealLabeler`], a noiseless oracle backed by
//! a fully labeled dataset; interactive or noisy oracles implement
//! [`Labeler`](crate::traits::Labeler) themselves.

use crate::dataset::{Dataset, Label};
use crate::error::{PreguntarError, Result};
use crate::traits::Labeler;

/// Noiseless oracle that answers from a fully labeled ground-truth dataset.
///
/// # Examples
///
/// ```
/// use preguntar::dataset::Dataset;
/// use preguntar::labelers::IdealLabeler;
/// use preguntar::traits::Labeler;
///
/// let truth = Dataset::new(
///     vec![vec![0.0], vec![1.0]],
///     vec![Some(0), Some(1)],
/// )
/// .expect("lengths match");
/// let mut oracle = IdealLabeler::new(&truth).expect("fully labeled");
///
/// assert_eq!(oracle.label(&[1.0]).expect("known entry"), 1);
/// assert_eq!(oracle.label_by_id(0).expect("known entry"), 0);
/// ```
#[derive(Debug, Clone)]
pub struct IdealLabeler {
    features: Vec<Vec<f32>>,
    labels: Vec<Label>,
}

impl IdealLabeler {
    /// Builds the oracle from a ground-truth dataset.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when any entry is unlabeled.
    pub fn new(truth: &Dataset) -> Result<Self> {
        let mut features = Vec::with_capacity(truth.len());
        let mut labels = Vec::with_capacity(truth.len());
        for entry in truth.get_entries() {
            match entry.label {
                Some(label) => {
                    features.push(entry.features.clone());
                    labels.push(label);
                }
                None => {
                    return Err(PreguntarError::configuration(
                        "ground-truth dataset must be fully labeled",
                    ));
                }
            }
        }
        Ok(Self { features, labels })
    }

    /// Label of the entry with the given identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PreguntarError::UnknownEntry`] when the identifier is
    /// outside the ground-truth dataset.
    pub fn label_by_id(&self, entry_id: usize) -> Result<Label> {
        self.labels
            .get(entry_id)
            .copied()
            .ok_or(PreguntarError::UnknownEntry { entry_id })
    }
}

impl Labeler for IdealLabeler {
    fn label(&mut self, features: &[f32]) -> Result<Label> {
        self.features
            .iter()
            .position(|f| f == features)
            .map(|i| self.labels[i])
            .ok_or_else(|| "no ground-truth entry matches the queried feature vector".into())
    }
}
