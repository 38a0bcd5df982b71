use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DataError;

fn default_true() -> bool {
    true
}

/// Construction parameters of a balanced iterator.
///
/// The struct is the single source of truth for how an iterator was built
/// and it can be read from or written to JSON. Checkpoints record its
/// sampling settings (`shuffle`, `repeat`, `ignore_labels`) and refuse to
/// restore into a sampler that ignores a different set of labels.
///
/// ```rust
/// use balancer_data::config::BalancedIteratorConfig;
///
/// let config: BalancedIteratorConfig<i32> =
///     BalancedIteratorConfig::from_json_str(r#"{"batch_size": 16, "ignore_labels": [1]}"#).unwrap();
/// assert!(config.shuffle && config.repeat);
/// assert_eq!(config.ignore_labels, vec![1]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalancedIteratorConfig<L> {
    /// Number of examples per batch.
    pub batch_size: usize,
    /// Shuffle per-label passes and each epoch's order.
    #[serde(default = "default_true")]
    pub shuffle: bool,
    /// Loop forever instead of stopping after the first epoch.
    #[serde(default = "default_true")]
    pub repeat: bool,
    /// Labels excluded from balancing and from produced batches.
    #[serde(default = "Vec::new")]
    pub ignore_labels: Vec<L>,
    /// Base seed for every shuffle. `None` draws one from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl<L> BalancedIteratorConfig<L> {
    /// Config with the given batch size and every other field at its default.
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size,
            shuffle: true,
            repeat: true,
            ignore_labels: Vec::new(),
            seed: None,
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_ignore_labels(mut self, ignore_labels: Vec<L>) -> Self {
        self.ignore_labels = ignore_labels;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks invariants that do not depend on the data.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.batch_size == 0 {
            return Err(DataError::config("batch_size must be greater than zero"));
        }
        Ok(())
    }
}

impl<L: Serialize + DeserializeOwned> BalancedIteratorConfig<L> {
    /// Parses and validates a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DataError::config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, DataError> {
        serde_json::to_string(self)
            .map_err(|e| DataError::config(format!("cannot serialise config: {}", e)))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
