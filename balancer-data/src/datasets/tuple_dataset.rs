use std::ops::Range;

use super::traits::Dataset;
use crate::error::DataError;
use crate::features::FeatureIndexable;

/// A dataset composed of one or more equally long columns.
///
/// Item `i` is the row made of the `i`-th element of every column, in column
/// order. A typical layout is `[features, labels]`, where the label column can
/// be pulled back out with `dataset.features().column(1)`.
#[derive(Debug, Clone)]
pub struct TupleDataset<T: Clone> {
    columns: Vec<Vec<T>>,
    length: usize,
}

impl<T: Clone> TupleDataset<T> {
    /// Creates a new `TupleDataset` from a vector of columns.
    ///
    /// An empty vector of columns yields a dataset of length 0.
    ///
    /// # Arguments
    ///
    /// * `columns` - The columns of the dataset, all of the same length.
    ///
    /// # Errors
    ///
    /// Returns `DataError::ConfigurationError` if the columns do not all have
    /// the same length.
    pub fn new(columns: Vec<Vec<T>>) -> Result<Self, DataError> {
        let length = columns.first().map_or(0, Vec::len);
        if let Some((i, column)) = columns
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, column)| column.len() != length)
        {
            return Err(DataError::config(format!(
                "TupleDataset::new: column {} has length {}, expected {}",
                i,
                column.len(),
                length
            )));
        }
        Ok(Self { columns, length })
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

impl<T: Clone> Dataset for TupleDataset<T> {
    type Item = Vec<T>;

    fn get(&self, index: usize) -> Result<Self::Item, DataError> {
        if index >= self.length {
            return Err(DataError::IndexOutOfBounds {
                index,
                len: self.length,
            });
        }
        Ok(self.columns.iter().map(|column| column[index].clone()).collect())
    }

    fn len(&self) -> usize {
        self.length
    }
}

impl<T: Clone> FeatureIndexable for TupleDataset<T> {
    type Feature = T;

    fn features_length(&self) -> usize {
        self.columns.len()
    }

    fn extract_feature(&self, i: usize, j: usize) -> Result<T, DataError> {
        let column = self.columns.get(j).ok_or(DataError::IndexOutOfBounds {
            index: j,
            len: self.columns.len(),
        })?;
        column.get(i).cloned().ok_or(DataError::IndexOutOfBounds {
            index: i,
            len: self.length,
        })
    }

    fn extract_feature_range(&self, range: Range<usize>, j: usize) -> Option<Vec<T>> {
        self.columns
            .get(j)
            .and_then(|column| column.get(range))
            .map(|values| values.to_vec())
    }
}

#[cfg(test)]
#[path = "tuple_dataset_test.rs"]
mod tests;
