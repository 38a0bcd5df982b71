pub mod traits;
pub mod vec_dataset;
pub mod tuple_dataset;

pub use traits::Dataset;
pub use vec_dataset::VecDataset;
pub use tuple_dataset::TupleDataset;
