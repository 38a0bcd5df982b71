//! Label-balanced, resumable dataset iteration.
//!
//! [`samplers::BalancedSampler`] draws the same number of examples from every
//! label in each epoch, cycling smaller labels through their own
//! [`samplers::IndexIterator`]. [`iterators::BalancedSerialIterator`] maps
//! those indices onto a [`datasets::Dataset`]. Both can be checkpointed
//! through [`checkpoint::StateDict`] and drive the epoch-based
//! [`schedule`]s.

pub mod checkpoint;
pub mod config;
pub mod datasets;
pub mod error;
pub mod features;
pub mod iterators;
pub mod samplers;
pub mod schedule;

// Re-export main components
pub use checkpoint::{Serializable, StateDict};
pub use config::BalancedIteratorConfig;
pub use datasets::{Dataset, TupleDataset, VecDataset};
pub use error::DataError;
pub use features::{FeatureIndexable, FeatureIndexer, Selection};
pub use iterators::BalancedSerialIterator;
pub use samplers::{BalancedSampler, IndexIterator, LabelStats, LabelStatus};
pub use schedule::{CosineAnnealing, EpochProgress, HyperParameter, ManualScheduleTrigger, ScheduleValue};
