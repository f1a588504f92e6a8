//! Sleep/normal mode control of the LIN transceiver.
//!
//! Transceivers like the TJA1021 expose a control input: driven high it
//! requests sleep, driven low it keeps the transceiver in normal mode.

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, ErrorType, OutputPin, PinState};
use tracing::trace;

use crate::error::{LinError, Result};

/// Settling time after a mode change, from the TJA1021 datasheet
pub const TRANSCEIVER_SETTLE_US: u32 = 20;

/// Transceiver mode as requested through the control line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransceiverState {
    Sleep,
    Normal,
}

impl From<TransceiverState> for PinState {
    fn from(state: TransceiverState) -> Self {
        match state {
            TransceiverState::Sleep => PinState::High,
            TransceiverState::Normal => PinState::Low,
        }
    }
}

pub struct Transceiver<P, D> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Transceiver<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Drives the control line to its idle level (normal mode).
    pub fn configure(&mut self) -> Result<()> {
        self.drive(TransceiverState::Normal)
    }

    /// Requests sleep (`true`) or normal mode (`false`), then waits for the transceiver to settle.
    pub fn sleep(&mut self, enter_sleep: bool) -> Result<()> {
        let state = if enter_sleep {
            TransceiverState::Sleep
        } else {
            TransceiverState::Normal
        };
        self.drive(state)?;
        self.delay.delay_us(TRANSCEIVER_SETTLE_US);
        Ok(())
    }

    /// Gives back the pin and delay provider.
    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }

    fn drive(&mut self, state: TransceiverState) -> Result<()> {
        trace!(?state, "transceiver control line");
        self.pin
            .set_state(state.into())
            .map_err(|e| LinError::Pin(e.kind()))
    }
}

/// Placeholder pin for stacks without a control line
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Placeholder delay for stacks without a control line
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
