use super::traits::Dataset;
use crate::error::DataError;
use crate::features::FeatureIndexable;

/// A simple dataset that wraps a `Vec` of items.
///
/// Each item in the `Vec` corresponds to a sample in the dataset.
///
/// # Type Parameters
///
/// * `T`: The type of the items stored in the dataset. Must be `Clone`, since
///   `get` hands out owned copies.
#[derive(Debug, Clone)]
pub struct VecDataset<T: Clone> {
    data: Vec<T>,
}

impl<T: Clone> VecDataset<T> {
    /// Creates a new `VecDataset` from a vector of items.
    ///
    /// # Arguments
    ///
    /// * `data` - A vector of items that will constitute the dataset.
    pub fn new(data: Vec<T>) -> Self {
        Self { data }
    }

    /// Borrows the underlying items.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Clone> Dataset for VecDataset<T> {
    type Item = T;

    /// Returns a clone of the item at the given index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the item to retrieve.
    ///
    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfBounds` if the index is out of bounds.
    fn get(&self, index: usize) -> Result<Self::Item, DataError> {
        self.data
            .get(index)
            .cloned()
            .ok_or(DataError::IndexOutOfBounds {
                index,
                len: self.data.len(),
            })
    }

    /// Returns the total number of items in the dataset.
    fn len(&self) -> usize {
        self.data.len()
    }
}

/// A `VecDataset` exposes its items as a single feature column.
impl<T: Clone> FeatureIndexable for VecDataset<T> {
    type Feature = T;

    fn features_length(&self) -> usize {
        1
    }

    fn extract_feature(&self, i: usize, _j: usize) -> Result<T, DataError> {
        self.get(i)
    }

    fn extract_feature_range(&self, range: std::ops::Range<usize>, _j: usize) -> Option<Vec<T>> {
        self.data.get(range).map(|items| items.to_vec())
    }
}

#[cfg(test)]
#[path = "vec_dataset_test.rs"]
mod tests;
