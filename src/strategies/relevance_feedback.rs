//! Relevance feedback sampling for binary labeling problems.

use crate::dataset::DatasetRef;
use crate::error::{PreguntarError, Result};
use crate::traits::{BatchQueryStrategy, ContinuousModel, QueryStrategy};

/// Ranks the unlabeled pool by the positive-class score of a trainable
/// binary model, most relevant first.
///
/// The model is trained once at construction. With
/// [`RelevanceFeedbackSampling::with_retrain`] enabled, it is refit on the
/// labeled entries before every query, so freshly resolved labels feed back
/// into the ranking.
///
/// Only binary problems are supported; construction fails when the dataset
/// already carries more than two distinct labels.
pub struct RelevanceFeedbackSampling {
    dataset: DatasetRef,
    model: Box<dyn ContinuousModel>,
    retrain: bool,
    last_scores: Vec<(usize, f32)>,
}

impl RelevanceFeedbackSampling {
    /// Binds the strategy to a dataset and trains the model on the labeled
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the dataset has more than two
    /// distinct labels, or propagates a training failure from the model.
    pub fn new(dataset: DatasetRef, mut model: Box<dyn ContinuousModel>) -> Result<Self> {
        let n_labels = dataset.get_num_of_labels();
        if n_labels > 2 {
            return Err(PreguntarError::configuration(format!(
                "relevance feedback supports binary problems only, dataset has {n_labels} labels"
            )));
        }
        model.train(&dataset.borrow())?;
        Ok(Self {
            dataset,
            model,
            retrain: false,
            last_scores: Vec::new(),
        })
    }

    /// Refit the model before every query.
    #[must_use]
    pub fn with_retrain(mut self, retrain: bool) -> Self {
        self.retrain = retrain;
        self
    }

    /// `(identifier, positive-class score)` pairs from the most recent
    /// query, best-first.
    #[must_use]
    pub fn scores(&self) -> &[(usize, f32)] {
        &self.last_scores
    }

    /// Scores the unlabeled pool and returns its identifiers ranked by
    /// descending positive-class score. Ties keep pool order.
    fn rank_unlabeled(&mut self) -> Result<Vec<usize>> {
        if self.retrain {
            self.model.train(&self.dataset.borrow())?;
        }
        let (ids, features) = self.dataset.get_unlabeled_entries();
        let dvalues = self.model.predict_real(&features);
        if dvalues.len() != ids.len() {
            return Err(PreguntarError::Other(format!(
                "continuous model returned {} score rows for {} entries",
                dvalues.len(),
                ids.len()
            )));
        }

        let mut scored = Vec::with_capacity(ids.len());
        for (id, dvalue) in ids.into_iter().zip(dvalues) {
            let score = dvalue.get(1).copied().ok_or_else(|| {
                PreguntarError::Other(
                    "continuous model returned fewer than two decision columns".to_string(),
                )
            })?;
            scored.push((id, score));
        }
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        self.last_scores = scored.clone();
        Ok(scored.into_iter().map(|(id, _)| id).collect())
    }
}

impl QueryStrategy for RelevanceFeedbackSampling {
    fn dataset(&self) -> &DatasetRef {
        &self.dataset
    }

    fn make_query(&mut self) -> Result<usize> {
        let mut batch = self.make_query_batch(1)?;
        batch.pop().ok_or_else(|| "batch query returned an empty batch".into())
    }
}

impl BatchQueryStrategy for RelevanceFeedbackSampling {
    fn make_query_batch(&mut self, n_ask: usize) -> Result<Vec<usize>> {
        let available = self.dataset.len_unlabeled();
        if n_ask > available {
            return Err(PreguntarError::InsufficientPool {
                requested: n_ask,
                available,
            });
        }
        let ranked = self.rank_unlabeled()?;
        Ok(ranked.into_iter().take(n_ask).collect())
    }
}
