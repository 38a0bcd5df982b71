use log::info;

use super::{EpochProgress, HyperParameter};
use crate::error::DataError;

/// Fires when progress crosses any of a fixed list of epoch points.
///
/// A point `p` is crossed by a batch when `previous < p <= current`. Before
/// the first batch the previous progress is treated as negative infinity.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualScheduleTrigger {
    points: Vec<f64>,
}

impl ManualScheduleTrigger {
    /// # Errors
    ///
    /// Returns `DataError::ConfigurationError` if any point is not finite.
    pub fn new(points: Vec<f64>) -> Result<Self, DataError> {
        if let Some(point) = points.iter().find(|p| !p.is_finite()) {
            return Err(DataError::config(format!("schedule point {} is not finite", point)));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Positions (in the original list) of the points crossed by the latest batch.
    pub fn crossed<P: EpochProgress + ?Sized>(&self, progress: &P) -> Vec<usize> {
        let current = progress.epoch_detail();
        let previous = progress.previous_epoch_detail().unwrap_or(f64::NEG_INFINITY);
        self.points
            .iter()
            .enumerate()
            .filter(|&(_, &p)| previous < p && p <= current)
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether the latest batch crossed at least one point.
    pub fn check<P: EpochProgress + ?Sized>(&self, progress: &P) -> bool {
        !self.crossed(progress).is_empty()
    }
}

/// Sets a hyperparameter to scheduled values at scheduled epochs.
///
/// ```rust
/// use balancer_data::schedule::{EpochProgress, ScheduleValue};
///
/// struct Progress(f64, f64);
/// impl EpochProgress for Progress {
///     fn epoch_detail(&self) -> f64 { self.1 }
///     fn previous_epoch_detail(&self) -> Option<f64> { Some(self.0) }
/// }
///
/// let schedule = ScheduleValue::new(vec![2.0, 4.0], vec![0.008, 0.002]).unwrap();
/// let mut lr = 0.01;
/// assert_eq!(schedule.apply(&Progress(1.9, 2.1), &mut lr), Some(0.008));
/// assert_eq!(lr, 0.008);
/// assert_eq!(schedule.apply(&Progress(2.1, 2.3), &mut lr), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleValue {
    trigger: ManualScheduleTrigger,
    values: Vec<f64>,
}

impl ScheduleValue {
    /// # Errors
    ///
    /// Returns `DataError::ConfigurationError` if the lists differ in length
    /// or a point is not finite.
    pub fn new(epochs: Vec<f64>, values: Vec<f64>) -> Result<Self, DataError> {
        if epochs.len() != values.len() {
            return Err(DataError::config(format!(
                "epoch list length {} and value list length {} must be the same",
                epochs.len(),
                values.len()
            )));
        }
        Ok(Self {
            trigger: ManualScheduleTrigger::new(epochs)?,
            values,
        })
    }

    /// Single change at a single epoch.
    pub fn single(epoch: f64, value: f64) -> Result<Self, DataError> {
        Self::new(vec![epoch], vec![value])
    }

    pub fn trigger(&self) -> &ManualScheduleTrigger {
        &self.trigger
    }

    /// Applies the value of the latest point crossed by the last batch, if any.
    pub fn apply<P, H>(&self, progress: &P, target: &mut H) -> Option<f64>
    where
        P: EpochProgress + ?Sized,
        H: HyperParameter + ?Sized,
    {
        let crossed = self.trigger.crossed(progress);
        let latest = crossed
            .into_iter()
            .max_by(|&a, &b| self.trigger.points[a].total_cmp(&self.trigger.points[b]))?;
        let value = self.values[latest];
        info!("ScheduleValue: updating value from {} to {}", target.value(), value);
        target.set_value(value);
        Some(value)
    }
}

#[cfg(test)]
#[path = "manual_schedule_test.rs"]
mod tests;
