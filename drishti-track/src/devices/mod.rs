//! Sample source implementations

pub mod mock;

pub use mock::SyntheticHead;
