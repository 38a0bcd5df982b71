pub mod balanced_serial_iterator;

pub use balanced_serial_iterator::BalancedSerialIterator;
