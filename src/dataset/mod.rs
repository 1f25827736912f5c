//! Dataset container for pool-based active learning.
//!
//! A [`Dataset`] holds entries that are either labeled or unlabeled. Entry
//! identifiers are positions assigned at construction; they are stable and
//! never reused, so a query result remains meaningful across labeling steps.
//!
//! Query strategies share one dataset through a [`DatasetRef`], a cheap
//! clonable handle whose equality is *identity*: two handles compare equal
//! only when they point at the same underlying dataset instance.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::BTreeSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::{PreguntarError, Result};

/// Class label attached to an entry.
pub type Label = i32;

/// A single dataset entry: a feature vector plus an optional label.
///
/// The entry's identifier is its index in the owning [`Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Feature vector of the entry
    pub features: Vec<f32>,
    /// Resolved label, or `None` while the entry is still in the unlabeled pool
    pub label: Option<Label>,
}

/// A partially labeled dataset.
///
/// # Examples
///
/// ```
/// use preguntar::dataset::Dataset;
///
/// let features = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.5, 0.5]];
/// let labels = vec![Some(1), None, None];
/// let dataset = Dataset::new(features, labels).expect("lengths match");
///
/// assert_eq!(dataset.len(), 3);
/// assert_eq!(dataset.get_unlabeled_idx(), vec![1, 2]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    entries: Vec<Entry>,
}

impl Dataset {
    /// Creates a dataset from parallel feature and label collections.
    ///
    /// Entry `i` gets identifier `i`, feature vector `features[i]` and label
    /// `labels[i]`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the collections differ in length.
    pub fn new(features: Vec<Vec<f32>>, labels: Vec<Option<Label>>) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(PreguntarError::configuration(format!(
                "features and labels must have the same length, got {} and {}",
                features.len(),
                labels.len()
            )));
        }
        let entries = features
            .into_iter()
            .zip(labels)
            .map(|(features, label)| Entry { features, label })
            .collect();
        Ok(Self { entries })
    }

    /// Creates a dataset directly from entries.
    #[must_use]
    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Total number of entries, labeled and unlabeled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the dataset holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with a resolved label.
    #[must_use]
    pub fn len_labeled(&self) -> usize {
        self.entries.iter().filter(|e| e.label.is_some()).count()
    }

    /// Number of entries still in the unlabeled pool.
    #[must_use]
    pub fn len_unlabeled(&self) -> usize {
        self.entries.iter().filter(|e| e.label.is_none()).count()
    }

    /// All entries in identifier order.
    #[must_use]
    pub fn get_entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Identifiers of the unlabeled pool, in ascending order.
    #[must_use]
    pub fn get_unlabeled_idx(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.label.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Identifiers and feature vectors of the unlabeled pool.
    #[must_use]
    pub fn get_unlabeled_entries(&self) -> (Vec<usize>, Vec<Vec<f32>>) {
        let mut ids = Vec::new();
        let mut features = Vec::new();
        for (id, entry) in self.entries.iter().enumerate() {
            if entry.label.is_none() {
                ids.push(id);
                features.push(entry.features.clone());
            }
        }
        (ids, features)
    }

    /// Feature vectors and labels of the labeled entries.
    #[must_use]
    pub fn get_labeled_entries(&self) -> (Vec<Vec<f32>>, Vec<Label>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for entry in &self.entries {
            if let Some(label) = entry.label {
                features.push(entry.features.clone());
                labels.push(label);
            }
        }
        (features, labels)
    }

    /// Number of distinct labels among the labeled entries.
    #[must_use]
    pub fn get_num_of_labels(&self) -> usize {
        self.entries
            .iter()
            .filter_map(|e| e.label)
            .collect::<BTreeSet<Label>>()
            .len()
    }

    /// Resolves the label of an entry; the external labeling step.
    ///
    /// # Errors
    ///
    /// Returns [`PreguntarError::UnknownEntry`] when `entry_id` is outside
    /// the dataset.
    pub fn update(&mut self, entry_id: usize, label: Label) -> Result<()> {
        match self.entries.get_mut(entry_id) {
            Some(entry) => {
                entry.label = Some(label);
                Ok(())
            }
            None => Err(PreguntarError::UnknownEntry { entry_id }),
        }
    }
}

/// Shared handle to a [`Dataset`].
///
/// Strategies and the mix engine are single-threaded collaborators over one
/// dataset, so the handle is `Rc<RefCell<_>>` rather than `Arc`. Equality is
/// identity: `a == b` holds only when both handles refer to the same dataset
/// instance, which is the invariant the mix engine checks at construction.
///
/// # Examples
///
/// ```
/// use preguntar::dataset::{Dataset, DatasetRef};
///
/// let dataset = DatasetRef::new(Dataset::default());
/// let same = dataset.clone();
/// let other = DatasetRef::new(Dataset::default());
///
/// assert_eq!(dataset, same);
/// assert_ne!(dataset, other);
/// ```
#[derive(Debug, Clone)]
pub struct DatasetRef {
    inner: Rc<RefCell<Dataset>>,
}

impl DatasetRef {
    /// Wraps a dataset in a shared handle.
    #[must_use]
    pub fn new(dataset: Dataset) -> Self {
        Self {
            inner: Rc::new(RefCell::new(dataset)),
        }
    }

    /// Immutable borrow of the underlying dataset.
    ///
    /// # Panics
    ///
    /// Panics if the dataset is already mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, Dataset> {
        self.inner.borrow()
    }

    /// Mutable borrow of the underlying dataset.
    ///
    /// # Panics
    ///
    /// Panics if the dataset is already borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, Dataset> {
        self.inner.borrow_mut()
    }

    /// Identifiers of the unlabeled pool, in ascending order.
    #[must_use]
    pub fn get_unlabeled_idx(&self) -> Vec<usize> {
        self.inner.borrow().get_unlabeled_idx()
    }

    /// Identifiers and feature vectors of the unlabeled pool.
    #[must_use]
    pub fn get_unlabeled_entries(&self) -> (Vec<usize>, Vec<Vec<f32>>) {
        self.inner.borrow().get_unlabeled_entries()
    }

    /// Number of entries still in the unlabeled pool.
    #[must_use]
    pub fn len_unlabeled(&self) -> usize {
        self.inner.borrow().len_unlabeled()
    }

    /// Number of distinct labels among the labeled entries.
    #[must_use]
    pub fn get_num_of_labels(&self) -> usize {
        self.inner.borrow().get_num_of_labels()
    }

    /// Resolves the label of an entry; the external labeling step.
    ///
    /// # Errors
    ///
    /// Returns [`PreguntarError::UnknownEntry`] when `entry_id` is outside
    /// the dataset.
    pub fn update(&self, entry_id: usize, label: Label) -> Result<()> {
        self.inner.borrow_mut().update(entry_id, label)
    }
}

impl PartialEq for DatasetRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for DatasetRef {}
