// balancer-data/src/schedule/cosine_annealing.rs

use std::f64::consts::PI;
use std::fmt;

use log::{debug, info};

use super::{EpochProgress, HyperParameter};
use crate::error::DataError;

/// Callback invoked with the index of the stage that just ended, right
/// before a restart. Useful for snapshot ensembling.
pub type RestartCallback = Box<dyn FnMut(usize) + Send>;

/// Cosine annealing with warm restarts (SGDR).
///
/// `epoch_list` splits training into stages `[e_k, e_{k+1})`. Within each
/// stage the value follows
/// `lr_min + 0.5 * (lr_max - lr_min) * (1 + cos(pi * t_cur / t_i))`, where
/// `t_cur` is the progress since the stage start and `t_i` the stage length,
/// and restarts at `lr_max` when the next stage begins. Outside
/// `[first, last]` the schedule leaves the value alone.
pub struct CosineAnnealing {
    epoch_list: Vec<f64>,
    lr_max: f64,
    lr_min: f64,
    current_stage: usize,
    callback: Option<RestartCallback>,
}

impl fmt::Debug for CosineAnnealing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosineAnnealing")
            .field("epoch_list", &self.epoch_list)
            .field("lr_max", &self.lr_max)
            .field("lr_min", &self.lr_min)
            .field("current_stage", &self.current_stage)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl CosineAnnealing {
    /// Creates a schedule over the stage boundaries in `epoch_list`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::ConfigurationError` unless `epoch_list` holds at
    /// least two finite, strictly ascending points.
    pub fn new(epoch_list: Vec<f64>, lr_max: f64, lr_min: f64) -> Result<Self, DataError> {
        if epoch_list.len() < 2 {
            return Err(DataError::config(
                "epoch_list must contain at least the first and last epoch",
            ));
        }
        if epoch_list.iter().any(|e| !e.is_finite()) {
            return Err(DataError::config("epoch_list must contain finite values"));
        }
        if epoch_list.windows(2).any(|w| w[0] >= w[1]) {
            return Err(DataError::config("epoch_list must be in strictly ascending order"));
        }
        Ok(Self {
            epoch_list,
            lr_max,
            lr_min,
            current_stage: 0,
            callback: None,
        })
    }

    /// Single annealing stage from epoch 0 to `last_epoch`, without restarts.
    pub fn without_restart(last_epoch: f64, lr_max: f64, lr_min: f64) -> Result<Self, DataError> {
        Self::new(vec![0.0, last_epoch], lr_max, lr_min)
    }

    pub fn with_callback(mut self, callback: RestartCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn current_stage(&self) -> usize {
        self.current_stage
    }

    /// Value the schedule prescribes at `epoch` within stage `stage`.
    fn value_at(&self, stage: usize, epoch: f64) -> f64 {
        let start = self.epoch_list[stage];
        let end = self.epoch_list[stage + 1];
        let t_cur = (epoch - start).min(end - start);
        let t_i = end - start;
        self.lr_min + 0.5 * (self.lr_max - self.lr_min) * (1.0 + (PI * t_cur / t_i).cos())
    }

    /// Index of the stage containing `epoch`, assuming `epoch` lies within
    /// `[first, last]`. The last point belongs to the final stage.
    fn stage_of(&self, epoch: f64) -> usize {
        let last_stage = self.epoch_list.len() - 2;
        self.epoch_list
            .iter()
            .position(|&e| e > epoch)
            .map_or(last_stage, |i| i - 1)
    }

    /// Updates `target` for the current progress and returns the new value,
    /// or `None` when the progress is outside the scheduled range.
    pub fn step<P, H>(&mut self, progress: &P, target: &mut H) -> Option<f64>
    where
        P: EpochProgress + ?Sized,
        H: HyperParameter + ?Sized,
    {
        let epoch = progress.epoch_detail();
        let first = self.epoch_list[0];
        let last = self.epoch_list[self.epoch_list.len() - 1];
        if epoch < first || epoch > last {
            return None;
        }

        let stage = self.stage_of(epoch);
        if stage != self.current_stage {
            info!(
                "CosineAnnealing: current stage updated from {} to {}",
                self.current_stage, stage
            );
            if let Some(callback) = self.callback.as_mut() {
                callback(self.current_stage);
            }
            self.current_stage = stage;
        }

        let value = self.value_at(stage, epoch);
        debug!("CosineAnnealing: updating value to {}", value);
        target.set_value(value);
        Some(value)
    }
}

#[cfg(test)]
#[path = "cosine_annealing_test.rs"]
mod tests;
