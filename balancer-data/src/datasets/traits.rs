use crate::error::DataError;

/// Represents a dataset that can be accessed by index.
///
/// The balanced iterators only ever perform positional lookups; they have no
/// knowledge of what an item looks like.
///
/// # Associated Types
///
/// * `Item`: The type of a single sample. Batches are `Vec<Item>`.
pub trait Dataset {
    /// The type of a single item returned by the dataset.
    type Item;

    /// Returns the item at the given index.
    ///
    /// # Arguments
    ///
    /// * `index` - The index of the item to retrieve, in `0..self.len()`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::IndexOutOfBounds` if `index >= self.len()`.
    fn get(&self, index: usize) -> Result<Self::Item, DataError>;

    /// Returns the total number of items in the dataset.
    fn len(&self) -> usize;

    /// Checks if the dataset is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
