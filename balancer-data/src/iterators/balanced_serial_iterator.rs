//! # BalancedSerialIterator
//!
//! Batches items out of a [`Dataset`] so that every label contributes the
//! same number of examples per epoch, whatever the class imbalance.
//!
//! ```rust
//! use balancer_data::config::BalancedIteratorConfig;
//! use balancer_data::datasets::VecDataset;
//! use balancer_data::iterators::BalancedSerialIterator;
//!
//! let dataset = VecDataset::new(vec!["a0", "a1", "b0", "b1", "b2", "b3"]);
//! let labels = vec![0, 0, 1, 1, 1, 1];
//! let config = BalancedIteratorConfig::new(4).with_repeat(false).with_seed(0);
//! let iterator = BalancedSerialIterator::new(dataset, &labels, config).unwrap();
//! let batches: Vec<_> = iterator.map(|batch| batch.unwrap()).collect();
//! assert_eq!(batches.concat().len(), 8);
//! ```

use std::fmt::{Debug, Display};

use log::warn;

use crate::checkpoint::{Serializable, StateDict};
use crate::config::BalancedIteratorConfig;
use crate::datasets::Dataset;
use crate::error::DataError;
use crate::features::FeatureIndexable;
use crate::samplers::{BalancedSampler, LabelStats};
use crate::schedule::EpochProgress;

/// Dataset iterator that serially reads label-balanced batches.
///
/// The dataset is a read-only collaborator: the iterator only performs
/// positional lookups on it.
///
/// As an [`Iterator`] it is fused on failure: once a batch comes back as an
/// `Err`, every later call to `next` returns `None` until
/// [`BalancedSerialIterator::reset`]. `next_batch` is not affected.
pub struct BalancedSerialIterator<D: Dataset, L> {
    dataset: D,
    config: BalancedIteratorConfig<L>,
    sampler: BalancedSampler<L>,
    failed: bool,
}

impl<D: Dataset, L: Ord + Clone + Display + Debug> BalancedSerialIterator<D, L> {
    /// Creates an iterator over `dataset`, where `labels[i]` is the label of
    /// item `i`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::ConfigurationError` if the config is invalid, if
    /// the labels do not match the dataset (see [`BalancedSampler::new`]) or
    /// if `config.batch_size` exceeds the balanced epoch size.
    pub fn new(dataset: D, labels: &[L], config: BalancedIteratorConfig<L>) -> Result<Self, DataError> {
        let sampler = BalancedSampler::new(labels, dataset.len(), &config)?;
        if config.batch_size > sampler.epoch_size() {
            return Err(DataError::config(format!(
                "batch_size {} exceeds the balanced epoch size {}",
                config.batch_size,
                sampler.epoch_size()
            )));
        }
        Ok(Self {
            dataset,
            config,
            sampler,
            failed: false,
        })
    }

    /// Creates an iterator whose labels are the `label_feature`-th feature
    /// of every item.
    pub fn from_label_feature(dataset: D, label_feature: isize, config: BalancedIteratorConfig<L>) -> Result<Self, DataError>
    where
        D: FeatureIndexable<Feature = L>,
    {
        let labels = dataset.features().column(label_feature)?;
        Self::new(dataset, &labels, config)
    }

    /// Returns the next batch of `config.batch_size` items.
    ///
    /// # Errors
    ///
    /// Propagates the sampler's errors, `DataError::IterationExhausted` in
    /// particular, and any lookup error from the dataset.
    pub fn next_batch(&mut self) -> Result<Vec<D::Item>, DataError> {
        let indices = self.sampler.next_indices(self.config.batch_size)?;
        indices.into_iter().map(|index| self.dataset.get(index)).collect()
    }

    /// Rewinds to the start of epoch 0.
    pub fn reset(&mut self) {
        self.sampler.reset();
        self.failed = false;
    }

    pub fn epoch(&self) -> usize {
        self.sampler.epoch()
    }

    pub fn epoch_detail(&self) -> f64 {
        self.sampler.epoch_detail()
    }

    pub fn previous_epoch_detail(&self) -> Option<f64> {
        self.sampler.previous_epoch_detail()
    }

    pub fn is_new_epoch(&self) -> bool {
        self.sampler.is_new_epoch()
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    pub fn label_stats(&self) -> Vec<LabelStats<L>> {
        self.sampler.label_stats()
    }

    pub fn dataset(&self) -> &D {
        &self.dataset
    }

    pub fn config(&self) -> &BalancedIteratorConfig<L> {
        &self.config
    }

    pub fn sampler(&self) -> &BalancedSampler<L> {
        &self.sampler
    }
}

impl<D: Dataset, L: Ord + Clone + Display + Debug> Iterator for BalancedSerialIterator<D, L> {
    type Item = Result<Vec<D::Item>, DataError>;

    /// Yields batches until a non-repeating iterator is exhausted or a batch
    /// fails; the failing batch is yielded once as `Some(Err(..))`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_batch() {
            Err(DataError::IterationExhausted { .. }) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
            ok => Some(ok),
        }
    }
}

impl<D: Dataset, L: Ord + Clone + Display + Debug> Serializable for BalancedSerialIterator<D, L> {
    fn state_dict(&self) -> Result<StateDict, DataError> {
        let mut state = self.sampler.state_dict()?;
        state.set("batch_size", self.config.batch_size)?;
        Ok(state)
    }

    fn load_state_dict(&mut self, state: &StateDict) -> Result<(), DataError> {
        if let Some(batch_size) = state.get_opt::<usize>("batch_size")? {
            if batch_size != self.config.batch_size {
                warn!(
                    "BalancedSerialIterator: checkpoint batch size {} differs from configured {}",
                    batch_size, self.config.batch_size
                );
            }
        }
        self.sampler.load_state_dict(state)?;
        self.failed = false;
        Ok(())
    }
}

impl<D: Dataset, L: Ord + Clone + Display + Debug> EpochProgress for BalancedSerialIterator<D, L> {
    fn epoch_detail(&self) -> f64 {
        self.sampler.epoch_detail()
    }

    fn previous_epoch_detail(&self) -> Option<f64> {
        self.sampler.previous_epoch_detail()
    }
}

#[cfg(test)]
#[path = "balanced_serial_iterator_test.rs"]
mod tests;
