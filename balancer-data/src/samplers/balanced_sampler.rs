// balancer-data/src/samplers/balanced_sampler.rs

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Display};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::index_iterator::IndexIterator;
use super::label_stats::{format_label_stats, LabelStats, LabelStatus};
use crate::checkpoint::{Serializable, StateDict};
use crate::config::BalancedIteratorConfig;
use crate::error::DataError;
use crate::schedule::EpochProgress;

const GENERATION_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// RNG for the `generation`-th shuffle round of a sampler seeded with `seed`.
fn generation_rng(seed: u64, generation: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ generation.wrapping_mul(GENERATION_STRIDE))
}

/// Stateful sampler producing label-balanced epochs of dataset indices.
///
/// Every included label contributes exactly `max_label_count` indices per
/// epoch, where `max_label_count` is the size of the largest included label.
/// Smaller labels are cycled through their own [`IndexIterator`] to make up
/// the difference, so an epoch holds `max_label_count * included labels`
/// indices and may be longer than the dataset itself.
///
/// All randomness derives from a base seed and a generation counter that is
/// bumped at every order regeneration; both are part of the checkpoint, so a
/// restored sampler continues with exactly the draws an uninterrupted one
/// would have made.
#[derive(Debug, Clone)]
pub struct BalancedSampler<L> {
    labels_iterators: BTreeMap<L, IndexIterator>,
    ignore_labels: BTreeSet<L>,
    dataset_len: usize,
    batch_size: usize,
    shuffle: bool,
    repeat: bool,
    max_label_count: usize,
    epoch_size: usize,
    order: Vec<usize>,
    current_position: usize,
    epoch: usize,
    is_new_epoch: bool,
    previous_epoch_detail: Option<f64>,
    seed: u64,
    generation: u64,
}

impl<L: Ord + Clone + Display + Debug> BalancedSampler<L> {
    /// Creates a sampler over `dataset_len` items labelled by `labels`.
    ///
    /// `config.batch_size` is only used to reconstruct
    /// `previous_epoch_detail` from checkpoints that lack it; the batch size
    /// of each draw is passed to [`BalancedSampler::next_indices`].
    ///
    /// # Errors
    ///
    /// Returns `DataError::ConfigurationError` if `labels.len() != dataset_len`,
    /// if the dataset is empty, if the config is invalid, if every label
    /// present is ignored, or if two distinct labels format to the same text
    /// (their checkpoint entries would collide).
    pub fn new(labels: &[L], dataset_len: usize, config: &BalancedIteratorConfig<L>) -> Result<Self, DataError> {
        config.validate()?;
        if labels.len() != dataset_len {
            return Err(DataError::config(format!(
                "dataset length {} and labels size {} must be the same",
                dataset_len,
                labels.len()
            )));
        }
        if labels.is_empty() {
            return Err(DataError::config("cannot balance an empty dataset"));
        }

        let mut partitions: BTreeMap<L, Vec<usize>> = BTreeMap::new();
        for (index, label) in labels.iter().enumerate() {
            partitions.entry(label.clone()).or_default().push(index);
        }
        let mut keys = BTreeSet::new();
        for label in partitions.keys() {
            let key = Self::iterator_key(label);
            if keys.contains(&key) {
                return Err(DataError::config(format!(
                    "label {:?} shares the checkpoint key {} with another label",
                    label, key
                )));
            }
            keys.insert(key);
        }

        let ignore_labels: BTreeSet<L> = config.ignore_labels.iter().cloned().collect();
        for label in ignore_labels.iter().filter(|l| !partitions.contains_key(*l)) {
            warn!("BalancedSampler: ignored label {} does not occur in the dataset", label);
        }

        let included_counts: Vec<usize> = partitions
            .iter()
            .filter(|(label, _)| !ignore_labels.contains(*label))
            .map(|(_, indices)| indices.len())
            .collect();
        let max_label_count = included_counts.iter().copied().max().ok_or_else(|| {
            DataError::config("every label in the dataset is ignored; nothing to sample")
        })?;
        let epoch_size = max_label_count * included_counts.len();

        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        let mut rng = generation_rng(seed, 0);
        let mut labels_iterators = BTreeMap::new();
        for (label, indices) in partitions {
            let iterator = IndexIterator::new(indices, config.shuffle, &mut rng)?;
            labels_iterators.insert(label, iterator);
        }

        let mut sampler = Self {
            labels_iterators,
            ignore_labels,
            dataset_len,
            batch_size: config.batch_size,
            shuffle: config.shuffle,
            repeat: config.repeat,
            max_label_count,
            epoch_size,
            order: Vec::new(),
            current_position: 0,
            epoch: 0,
            is_new_epoch: false,
            previous_epoch_detail: None,
            seed,
            generation: 1,
        };
        sampler.reset();
        debug!(
            "BalancedSampler: {} labels ({} included), max_label_count = {}, epoch_size = {}",
            sampler.labels_iterators.len(),
            included_counts.len(),
            max_label_count,
            epoch_size
        );
        Ok(sampler)
    }

    /// Returns the next `batch_size` indices.
    ///
    /// When the batch reaches the end of the current epoch, the rest of the
    /// batch is taken from the head of a freshly generated order, `epoch` is
    /// incremented and `is_new_epoch` is set for this call only. A
    /// non-repeating sampler instead ends the batch at the epoch boundary
    /// (the batch may then be shorter than `batch_size`) and refuses every
    /// later call until [`BalancedSampler::reset`].
    ///
    /// # Errors
    ///
    /// * `DataError::ConfigurationError` if `batch_size` is zero.
    /// * `DataError::BatchTooLarge` if `batch_size > epoch_size`.
    /// * `DataError::IterationExhausted` if the sampler does not repeat and
    ///   has already completed its epoch.
    pub fn next_indices(&mut self, batch_size: usize) -> Result<Vec<usize>, DataError> {
        if batch_size == 0 {
            return Err(DataError::config("batch_size must be greater than zero"));
        }
        if batch_size > self.epoch_size {
            return Err(DataError::BatchTooLarge {
                batch_size,
                epoch_size: self.epoch_size,
            });
        }
        if !self.repeat && self.epoch > 0 {
            return Err(DataError::IterationExhausted { epoch: self.epoch });
        }

        self.previous_epoch_detail = Some(self.epoch_detail());

        let i = self.current_position;
        let i_end = i + batch_size;
        let n = self.epoch_size;

        let mut batch = self.order[i..i_end.min(n)].to_vec();
        if i_end >= n {
            if self.repeat {
                let rest = i_end - n;
                self.update_order();
                batch.extend_from_slice(&self.order[..rest]);
                self.current_position = rest;
            } else {
                self.current_position = 0;
            }
            self.epoch += 1;
            self.is_new_epoch = true;
            debug!("BalancedSampler: epoch {} completed", self.epoch);
        } else {
            self.is_new_epoch = false;
            self.current_position = i_end;
        }
        Ok(batch)
    }

    /// Regenerates the order and rewinds to the start of epoch 0.
    ///
    /// Per-label iterators keep their positions; the generation counter keeps
    /// counting so that a reset never replays earlier shuffles.
    pub fn reset(&mut self) {
        self.update_order();
        self.current_position = 0;
        self.epoch = 0;
        self.is_new_epoch = false;
        self.previous_epoch_detail = None;
    }

    fn next_rng(&mut self) -> StdRng {
        let rng = generation_rng(self.seed, self.generation);
        self.generation += 1;
        rng
    }

    fn update_order(&mut self) {
        let mut rng = self.next_rng();
        let mut order = Vec::with_capacity(self.epoch_size);
        for (label, iterator) in self.labels_iterators.iter_mut() {
            if self.ignore_labels.contains(label) {
                continue;
            }
            order.extend(iterator.next_indices(self.max_label_count, &mut rng));
        }
        if self.shuffle {
            order.shuffle(&mut rng);
        }
        self.order = order;
    }

    /// `epoch + current_position / epoch_size`.
    pub fn epoch_detail(&self) -> f64 {
        self.epoch as f64 + self.current_position as f64 / self.epoch_size as f64
    }

    /// `epoch_detail` as it was before the latest draw; `None` before the
    /// first draw after construction or reset.
    pub fn previous_epoch_detail(&self) -> Option<f64> {
        self.previous_epoch_detail
    }

    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn is_new_epoch(&self) -> bool {
        self.is_new_epoch
    }

    pub fn current_position(&self) -> usize {
        self.current_position
    }

    /// The current epoch's full order of indices.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn epoch_size(&self) -> usize {
        self.epoch_size
    }

    pub fn max_label_count(&self) -> usize {
        self.max_label_count
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn dataset_len(&self) -> usize {
        self.dataset_len
    }

    pub fn repeat(&self) -> bool {
        self.repeat
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether iteration has ended; only a non-repeating sampler gets here.
    pub fn is_exhausted(&self) -> bool {
        !self.repeat && self.epoch > 0
    }

    pub fn is_ignored(&self, label: &L) -> bool {
        self.ignore_labels.contains(label)
    }

    /// Labels that are drawn from, in ascending order.
    pub fn included_labels(&self) -> Vec<&L> {
        self.labels_iterators
            .keys()
            .filter(|label| !self.ignore_labels.contains(*label))
            .collect()
    }

    /// The per-label iterator for `label`, ignored labels included.
    pub fn index_iterator(&self, label: &L) -> Option<&IndexIterator> {
        self.labels_iterators.get(label)
    }

    /// Count, dataset share and status of every label, in ascending label order.
    pub fn label_stats(&self) -> Vec<LabelStats<L>> {
        self.labels_iterators
            .iter()
            .map(|(label, iterator)| LabelStats {
                label: label.clone(),
                count: iterator.len(),
                rate: iterator.len() as f64 / self.dataset_len as f64,
                status: if self.ignore_labels.contains(label) {
                    LabelStatus::Ignored
                } else {
                    LabelStatus::Included
                },
            })
            .collect()
    }

    /// Logs the `label_stats` table at info level.
    pub fn log_label_stats(&self) {
        info!("Label statistics:\n{}", format_label_stats(&self.label_stats()));
    }

    fn iterator_key(label: &L) -> String {
        format!("index_iterator_{}", label)
    }

    /// Ignored labels in the textual form checkpoints store them in.
    fn ignore_label_keys(&self) -> BTreeSet<String> {
        self.ignore_labels.iter().map(ToString::to_string).collect()
    }

    /// Checks that the settings recorded in `state` agree with this sampler.
    ///
    /// Checkpoints written before the settings were recorded are accepted.
    fn check_config(&self, state: &StateDict) -> Result<(), DataError> {
        if !state.contains_key("config") {
            return Ok(());
        }
        let config = state.child("config")?;
        let ignore_labels: BTreeSet<String> = config.get("ignore_labels")?;
        if ignore_labels != self.ignore_label_keys() {
            return Err(DataError::invalid_checkpoint(
                "config",
                format!(
                    "checkpoint ignores labels {:?}, sampler ignores {:?}",
                    ignore_labels,
                    self.ignore_label_keys()
                ),
            ));
        }
        for (key, current) in [("shuffle", self.shuffle), ("repeat", self.repeat)] {
            if let Some(saved) = config.get_opt::<bool>(key)? {
                if saved != current {
                    warn!(
                        "BalancedSampler: checkpoint was saved with {} = {}, continuing with {}",
                        key, saved, current
                    );
                }
            }
        }
        Ok(())
    }

    /// Checks that `order` holds exactly `max_label_count` indices of every
    /// included label and nothing else.
    fn check_order(&self, order: &[usize]) -> Result<(), DataError> {
        let included = self.included_labels();
        let mut slot_of_index = vec![None; self.dataset_len];
        for (slot, label) in included.iter().enumerate() {
            if let Some(iterator) = self.labels_iterators.get(*label) {
                for &index in iterator.index_list() {
                    slot_of_index[index] = Some(slot);
                }
            }
        }

        let mut counts = vec![0usize; included.len()];
        for &index in order {
            if index >= self.dataset_len {
                return Err(DataError::invalid_checkpoint(
                    "order",
                    format!("index {} is out of bounds for dataset length {}", index, self.dataset_len),
                ));
            }
            match slot_of_index[index] {
                Some(slot) => counts[slot] += 1,
                None => {
                    return Err(DataError::invalid_checkpoint(
                        "order",
                        format!("index {} does not belong to an included label", index),
                    ))
                }
            }
        }
        if let Some((label, count)) = included
            .iter()
            .zip(&counts)
            .find(|&(_, &count)| count != self.max_label_count)
        {
            return Err(DataError::invalid_checkpoint(
                "order",
                format!(
                    "label {} appears {} times, expected {}",
                    label, count, self.max_label_count
                ),
            ));
        }
        Ok(())
    }
}

impl<L: Ord + Clone + Display + Debug> Serializable for BalancedSampler<L> {
    fn state_dict(&self) -> Result<StateDict, DataError> {
        let mut state = StateDict::new();
        state.set("current_position", self.current_position)?;
        state.set("epoch", self.epoch)?;
        state.set("is_new_epoch", self.is_new_epoch)?;
        state.set("order", &self.order)?;
        // -1 stands for "none" so the value stays a plain number.
        state.set("previous_epoch_detail", self.previous_epoch_detail.unwrap_or(-1.0))?;
        state.set("rng_seed", self.seed)?;
        state.set("rng_generation", self.generation)?;
        let mut config = StateDict::new();
        config.set("shuffle", self.shuffle)?;
        config.set("repeat", self.repeat)?;
        config.set("ignore_labels", self.ignore_label_keys())?;
        state.set_child("config", config)?;
        for (label, iterator) in &self.labels_iterators {
            state.set_child(&Self::iterator_key(label), iterator.state_dict()?)?;
        }
        Ok(state)
    }

    fn load_state_dict(&mut self, state: &StateDict) -> Result<(), DataError> {
        self.check_config(state)?;
        let current_position: usize = state.get("current_position")?;
        let epoch: usize = state.get("epoch")?;
        let is_new_epoch: bool = state.get("is_new_epoch")?;
        let order: Vec<usize> = match state.get_opt("order")? {
            Some(order) => order,
            None => state
                .get_opt("_order")?
                .ok_or_else(|| DataError::MissingKey("order".to_string()))?,
        };

        if order.len() != self.epoch_size {
            return Err(DataError::invalid_checkpoint(
                "order",
                format!("length {} does not match epoch size {}", order.len(), self.epoch_size),
            ));
        }
        self.check_order(&order)?;
        if current_position > self.epoch_size {
            return Err(DataError::invalid_checkpoint(
                "current_position",
                format!("{} exceeds epoch size {}", current_position, self.epoch_size),
            ));
        }

        let epoch_detail = epoch as f64 + current_position as f64 / self.epoch_size as f64;
        let previous_epoch_detail = match state.get_opt::<f64>("previous_epoch_detail")? {
            Some(value) if value < 0.0 => None,
            Some(value) => Some(value),
            None => {
                warn!("BalancedSampler: checkpoint has no previous_epoch_detail, estimating it from epoch and position");
                let guess = epoch as f64
                    + (current_position as f64 - self.batch_size as f64) / self.epoch_size as f64;
                if epoch_detail > 0.0 {
                    Some(guess.max(0.0))
                } else {
                    None
                }
            }
        };

        let seed = state.get_opt("rng_seed")?.unwrap_or(self.seed);
        let generation = state.get_opt("rng_generation")?.unwrap_or(self.generation);

        let mut labels_iterators = BTreeMap::new();
        for (label, iterator) in &self.labels_iterators {
            let child = state.child(&Self::iterator_key(label))?;
            labels_iterators.insert(label.clone(), iterator.restored(&child)?);
        }

        self.current_position = current_position;
        self.epoch = epoch;
        self.is_new_epoch = is_new_epoch;
        self.order = order;
        self.previous_epoch_detail = previous_epoch_detail;
        self.seed = seed;
        self.generation = generation;
        self.labels_iterators = labels_iterators;
        Ok(())
    }
}

impl<L: Ord + Clone + Display + Debug> EpochProgress for BalancedSampler<L> {
    fn epoch_detail(&self) -> f64 {
        BalancedSampler::epoch_detail(self)
    }

    fn previous_epoch_detail(&self) -> Option<f64> {
        BalancedSampler::previous_epoch_detail(self)
    }
}

#[cfg(test)]
#[path = "balanced_sampler_test.rs"]
mod tests;
