//! Key/value snapshots of iterator state.
//!
//! A [`StateDict`] is an ordered map from string keys to JSON values, with
//! nested dicts for sub-components. Objects that can be snapshotted implement
//! [`Serializable`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DataError;

/// Ordered key/value store used to save and restore state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateDict {
    entries: BTreeMap<String, Value>,
}

impl StateDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), DataError> {
        let value = serde_json::to_value(value)
            .map_err(|e| DataError::invalid_checkpoint(key, e.to_string()))?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    /// Reads the value under `key`.
    ///
    /// # Errors
    ///
    /// `DataError::MissingKey` if absent, `DataError::InvalidCheckpoint` if
    /// the stored value does not deserialise into `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, DataError> {
        self.get_opt(key)?
            .ok_or_else(|| DataError::MissingKey(key.to_string()))
    }

    /// Like [`StateDict::get`], but an absent key yields `Ok(None)`.
    pub fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DataError> {
        self.entries
            .get(key)
            .map(|value| {
                T::deserialize(value).map_err(|e| DataError::invalid_checkpoint(key, e.to_string()))
            })
            .transpose()
    }

    /// Stores a nested dict under `key`.
    pub fn set_child(&mut self, key: &str, child: StateDict) -> Result<(), DataError> {
        self.set(key, child)
    }

    /// Reads the nested dict stored under `key`.
    pub fn child(&self, key: &str) -> Result<StateDict, DataError> {
        self.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialises the whole dict, nested dicts included, to a JSON string.
    pub fn to_json_string(&self) -> Result<String, DataError> {
        serde_json::to_string(self).map_err(|e| DataError::invalid_checkpoint("<root>", e.to_string()))
    }

    /// Parses a dict previously written by [`StateDict::to_json_string`].
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        serde_json::from_str(json).map_err(|e| DataError::invalid_checkpoint("<root>", e.to_string()))
    }
}

/// Objects whose state can be captured in and restored from a [`StateDict`].
pub trait Serializable {
    /// Captures the current state.
    fn state_dict(&self) -> Result<StateDict, DataError>;

    /// Restores state previously captured by `state_dict`.
    ///
    /// Implementations validate the whole dict before mutating anything, so
    /// an error leaves the object untouched.
    fn load_state_dict(&mut self, state: &StateDict) -> Result<(), DataError>;
}

#[cfg(test)]
#[path = "checkpoint_test.rs"]
mod tests;
