//! The three signing stages.

pub mod combine;
pub mod multi_hash;
pub mod single_hash;

pub use combine::{Combine, combine};
pub use multi_hash::MultiHash;
pub use single_hash::SingleHash;
