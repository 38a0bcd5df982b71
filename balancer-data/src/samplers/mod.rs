pub mod index_iterator;
pub mod balanced_sampler;
pub mod label_stats;

pub use index_iterator::IndexIterator;
pub use balanced_sampler::BalancedSampler;
pub use label_stats::{format_label_stats, LabelStats, LabelStatus};
