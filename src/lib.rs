//! LIN bus master/slave stack for UART-driven LIN transceivers.
//!
//! Layers, bottom-up:
//! - [`physical`]: the UART [`Channel`](physical::Channel), break and wake-up
//!   generation, transceiver sleep control
//! - [`data_link`]: identifier parity, checksums, [`LinFrame`](data_link::LinFrame)
//! - [`transport`]: [`LinStack`](transport::LinStack), the frame operations

pub mod data_link; // Frame codec
pub mod physical; // UART channel, bus signaling, transceiver control
pub mod transport; // Frame-level write/read operations

// Re-exports for convenience
pub use data_link::{ChecksumModel, LinFrame};
pub use physical::transceiver::Transceiver;
pub use physical::Channel;
pub use transport::{LinConfig, LinStack};

// Common types and traits
pub mod error;
pub mod types;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
