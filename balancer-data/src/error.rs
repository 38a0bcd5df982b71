use thiserror::Error;

/// Error type shared by every module of the crate.
#[derive(Error, Debug, PartialEq, Clone)]
pub enum DataError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Batch size {batch_size} exceeds the balanced epoch size {epoch_size}")]
    BatchTooLarge { batch_size: usize, epoch_size: usize },

    #[error("Iteration exhausted after epoch {epoch}; call reset() to iterate again")]
    IterationExhausted { epoch: usize },

    #[error("Index out of bounds: index {index} for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Feature index error: {0}")]
    FeatureIndexError(String),

    #[error("Checkpoint is missing key '{0}'")]
    MissingKey(String),

    #[error("Invalid checkpoint value for '{key}': {message}")]
    InvalidCheckpoint { key: String, message: String },
}

impl DataError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        DataError::ConfigurationError(message.into())
    }

    pub(crate) fn invalid_checkpoint(key: &str, message: impl Into<String>) -> Self {
        DataError::InvalidCheckpoint {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
