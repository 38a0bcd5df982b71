//! Two-dimensional feature access over datasets.
//!
//! Axis 0 selects dataset items, axis 1 selects features within an item.
//! A dataset opts in by implementing [`FeatureIndexable`]; the
//! [`FeatureIndexer`] returned by [`FeatureIndexable::features`] does the
//! index normalisation and selection bookkeeping.
//!
//! ```rust
//! use balancer_data::datasets::TupleDataset;
//! use balancer_data::features::{FeatureIndexable, Selection};
//!
//! let dataset = TupleDataset::new(vec![vec![0, 1, 2], vec![0, 1, 4]]).unwrap();
//! let targets = dataset.features().column(1).unwrap();
//! assert_eq!(targets, vec![0, 1, 4]);
//! let tail = dataset.features().select(&Selection::Index(-1), &Selection::All).unwrap();
//! assert_eq!(tail, vec![vec![2], vec![4]]);
//! ```

use std::ops::Range;

use crate::datasets::Dataset;
use crate::error::DataError;

/// A dataset whose items are made of a fixed number of addressable features.
pub trait FeatureIndexable: Dataset {
    /// Type of a single feature value.
    type Feature: Clone;

    /// Number of features per item.
    fn features_length(&self) -> usize;

    /// Extracts the `j`-th feature of the `i`-th item.
    fn extract_feature(&self, i: usize, j: usize) -> Result<Self::Feature, DataError>;

    /// Extracts the `j`-th feature for a contiguous range of items.
    ///
    /// Returns `None` when the dataset has no fast path, in which case the
    /// indexer falls back to `extract_feature` per item.
    fn extract_feature_range(&self, _range: Range<usize>, _j: usize) -> Option<Vec<Self::Feature>> {
        None
    }

    /// Returns a feature indexer borrowing this dataset.
    fn features(&self) -> FeatureIndexer<'_, Self>
    where
        Self: Sized,
    {
        FeatureIndexer::new(self)
    }
}

/// One axis of a feature selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Every position along the axis.
    All,
    /// A single position; negative values count from the end.
    Index(isize),
    /// A half-open range, clamped to the axis length.
    Range(Range<usize>),
    /// Explicit positions; negative values count from the end.
    List(Vec<isize>),
    /// A boolean mask, which must be exactly as long as the axis.
    Mask(Vec<bool>),
}

impl Selection {
    /// Resolves the selection into concrete positions for an axis of length `len`.
    pub fn resolve(&self, len: usize) -> Result<Vec<usize>, DataError> {
        match self {
            Selection::All => Ok((0..len).collect()),
            Selection::Index(i) => Ok(vec![normalize_index(*i, len)?]),
            Selection::Range(range) => {
                let end = range.end.min(len);
                Ok((range.start.min(end)..end).collect())
            }
            Selection::List(list) => list.iter().map(|&i| normalize_index(i, len)).collect(),
            Selection::Mask(mask) => {
                if mask.len() != len {
                    return Err(DataError::FeatureIndexError(format!(
                        "mask has length {} instead of {}",
                        mask.len(),
                        len
                    )));
                }
                Ok(mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &keep)| keep.then_some(i))
                    .collect())
            }
        }
    }

    /// Contiguous range covered by this selection, if it has one.
    fn as_range(&self, len: usize) -> Option<Range<usize>> {
        match self {
            Selection::All => Some(0..len),
            Selection::Range(range) => {
                let end = range.end.min(len);
                Some(range.start.min(end)..end)
            }
            _ => None,
        }
    }
}

fn normalize_index(index: isize, len: usize) -> Result<usize, DataError> {
    let resolved = if index < 0 {
        len as isize + index
    } else {
        index
    };
    if resolved < 0 || resolved as usize >= len {
        return Err(DataError::FeatureIndexError(format!(
            "index {} is out of bounds for axis with size {}",
            index, len
        )));
    }
    Ok(resolved as usize)
}

/// Borrowing adapter providing two-dimensional access to a dataset.
#[derive(Debug)]
pub struct FeatureIndexer<'a, D: FeatureIndexable> {
    dataset: &'a D,
}

impl<'a, D: FeatureIndexable> FeatureIndexer<'a, D> {
    pub fn new(dataset: &'a D) -> Self {
        Self { dataset }
    }

    /// `(dataset length, number of features)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.dataset.len(), self.dataset.features_length())
    }

    /// Single feature value of a single item.
    pub fn get(&self, i: isize, j: isize) -> Result<D::Feature, DataError> {
        let (rows, cols) = self.shape();
        self.dataset
            .extract_feature(normalize_index(i, rows)?, normalize_index(j, cols)?)
    }

    /// Every item's `j`-th feature.
    pub fn column(&self, j: isize) -> Result<Vec<D::Feature>, DataError> {
        let j = normalize_index(j, self.dataset.features_length())?;
        self.extract_rows(&Selection::All, j)
    }

    /// Selects items along axis 0 and features along axis 1.
    ///
    /// The result is feature-major: one vector per selected feature, each
    /// holding that feature for every selected item.
    pub fn select(&self, rows: &Selection, cols: &Selection) -> Result<Vec<Vec<D::Feature>>, DataError> {
        let cols = cols.resolve(self.dataset.features_length())?;
        cols.into_iter().map(|j| self.extract_rows(rows, j)).collect()
    }

    fn extract_rows(&self, rows: &Selection, j: usize) -> Result<Vec<D::Feature>, DataError> {
        let len = self.dataset.len();
        if let Some(range) = rows.as_range(len) {
            if let Some(values) = self.dataset.extract_feature_range(range, j) {
                return Ok(values);
            }
        }
        rows.resolve(len)?
            .into_iter()
            .map(|i| self.dataset.extract_feature(i, j))
            .collect()
    }
}

#[cfg(test)]
#[path = "features_test.rs"]
mod tests;
