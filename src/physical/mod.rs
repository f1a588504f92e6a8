//! Physical layer of the LIN stack.
//!
//! The stack never touches hardware registers directly. It talks to:
//! - a [`Channel`]: the UART the LIN transceiver's TX/RX lines hang off
//! - an optional control line driving the transceiver's sleep input, see [`transceiver`]
//!
//! On top of the channel, [`signaling`] produces the break field and the
//! bus wake-up pulse by temporarily changing the UART data rate.
//!
//! # Examples
//!
//! ```rust,no_run
//! use linstack::physical::{mock::MockChannel, signaling};
//!
//! let mut uart = MockChannel::new();
//! signaling::send_break(&mut uart, 19_200).unwrap();
//! ```

pub mod signaling;
pub mod transceiver;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use crate::error::Result;
use crate::types::Baud;
use bitflags::bitflags;

bitflags! {
    /// Receiver status as reported by the UART, pollable without blocking
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LineStatus: u8 {
        const NONE = 0;
        /// A stop bit was sampled dominant, which is how a break field shows up
        const FRAMING_ERROR = 1;
        /// Dedicated break detection, on UARTs that have it
        const BREAK_DETECTED = 2;
        const OVERRUN = 4;
        const PARITY_ERROR = 8;
    }
}

impl LineStatus {
    /// True when the receiver saw something that looks like a LIN break.
    pub fn is_break(&self) -> bool {
        self.intersects(LineStatus::FRAMING_ERROR | LineStatus::BREAK_DETECTED)
    }
}

/// Serial channel trait that must be implemented by platform-specific UART code
///
/// The channel is borrowed by the stack; it is never opened or closed
/// implicitly beyond the data rate changes described on each method.
pub trait Channel {
    /// (Re)configures the data rate. Called repeatedly, must be cheap.
    fn open(&mut self, baud: Baud) -> Result<()>;

    /// Queues one byte for transmission.
    fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Queues a run of bytes for transmission.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }

    /// Blocks until every queued byte has left the shift register.
    fn flush(&mut self) -> Result<()>;

    /// Blocking read of up to `buf.len()` bytes, returning how many arrived.
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Current receiver status flags.
    fn line_status(&mut self) -> LineStatus;
}
