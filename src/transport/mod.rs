//! Frame-level operations composed from the codec and the physical layer.

pub mod lin;

pub use lin::{LinConfig, LinStack};
