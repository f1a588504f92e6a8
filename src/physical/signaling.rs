//! Break field and wake-up pulse generation.
//!
//! Commodity UARTs cannot hold the line dominant on request, so both
//! signals are synthesized from a single `0x00` byte sent at a slower data
//! rate: the start bit plus eight zero data bits form one long low pulse.

use std::time::{Duration, Instant};

use tracing::{trace, warn};

use super::Channel;
use crate::data_link::LIN_BREAK_BYTE;
use crate::error::{LinError, Result};
use crate::types::Baud;

/// A zero byte at 19200 baud keeps the bus dominant for ~470us.
pub const WAKE_UP_BAUD: Baud = 19_200;

/// Sends the break field and leaves the channel at `baud`.
///
/// LIN only asks for at least 13 dominant bits. Nine zero bits at half the
/// data rate last 18 bit times, followed by the recessive stop bit.
pub fn send_break<C: Channel + ?Sized>(channel: &mut C, baud: Baud) -> Result<()> {
    channel.flush()?;
    trace!(baud = baud / 2, "break: dropping data rate");
    channel.open(baud / 2)?;
    channel.write_byte(LIN_BREAK_BYTE)?;
    channel.flush()?;
    channel.open(baud)
}

/// Polls the channel until it reports a break or `timeout` elapses.
///
/// `Duration::MAX` waits forever. A zero timeout polls exactly once.
pub fn wait_for_break<C: Channel + ?Sized>(channel: &mut C, timeout: Duration) -> Result<()> {
    let start = Instant::now();
    loop {
        if channel.line_status().is_break() {
            return Ok(());
        }
        if timeout != Duration::MAX && start.elapsed() >= timeout {
            warn!(?timeout, "no break detected");
            return Err(LinError::Timeout);
        }
        std::hint::spin_loop();
    }
}

/// Emits the wake-up pulse and restores `baud`.
pub fn send_wake_up<C: Channel + ?Sized>(channel: &mut C, baud: Baud) -> Result<()> {
    channel.flush()?;
    trace!(baud = WAKE_UP_BAUD, "wake-up: switching data rate");
    channel.open(WAKE_UP_BAUD)?;
    channel.write_byte(LIN_BREAK_BYTE)?;
    channel.flush()?;
    channel.open(baud)
}
