//! Hyperparameter schedules driven by fractional epoch progress.
//!
//! Schedules read `epoch_detail` from anything implementing
//! [`EpochProgress`] (typically a balanced sampler or iterator) and write
//! values through the [`HyperParameter`] seam.

pub mod cosine_annealing;
pub mod manual_schedule;

pub use cosine_annealing::CosineAnnealing;
pub use manual_schedule::{ManualScheduleTrigger, ScheduleValue};

/// Source of training progress measured in (fractional) epochs.
pub trait EpochProgress {
    /// Current progress, e.g. `2.25` a quarter of the way into the third epoch.
    fn epoch_detail(&self) -> f64;

    /// Progress before the latest batch, `None` before the first one.
    fn previous_epoch_detail(&self) -> Option<f64>;
}

/// A single scalar hyperparameter, such as an optimizer's learning rate.
pub trait HyperParameter {
    fn value(&self) -> f64;
    fn set_value(&mut self, value: f64);
}

impl HyperParameter for f64 {
    fn value(&self) -> f64 {
        *self
    }

    fn set_value(&mut self, value: f64) {
        *self = value;
    }
}
