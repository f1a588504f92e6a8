use std::time::Duration;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use tracing::debug;

use crate::data_link::{
    frame_checksum, verify_checksum, ChecksumModel, LinFrame, LIN_MAX_PAYLOAD, LIN_SYNC_BYTE,
};
use crate::error::{LinError, Result};
use crate::physical::signaling;
use crate::physical::transceiver::{NoDelay, NoPin, Transceiver};
use crate::physical::Channel;
use crate::types::{Baud, Config};

/// Lowest data rate a LIN node has to support
pub const LIN_MIN_BAUD: Baud = 1_000;
/// Highest data rate a LIN node has to support
pub const LIN_MAX_BAUD: Baud = 20_000;

#[derive(Debug, Clone)]
pub struct LinConfig {
    pub baud: Baud,
    /// Identifier byte this node answers to; compared verbatim on [`LinStack::read`]
    pub ident: u8,
    pub checksum: ChecksumModel,
}

impl Config for LinConfig {
    fn validate(&self) -> Result<()> {
        if !(LIN_MIN_BAUD..=LIN_MAX_BAUD).contains(&self.baud) {
            return Err(LinError::InvalidParameter);
        }
        Ok(())
    }
}

impl Default for LinConfig {
    fn default() -> Self {
        Self {
            baud: 19_200,
            ident: 0,
            checksum: ChecksumModel::Classic,
        }
    }
}

/// LIN master/slave stack over a borrowed UART
///
/// Every operation is blocking and leaves the stack usable after a failure;
/// retry policy belongs to the caller.
pub struct LinStack<'a, C: Channel, P = NoPin, D = NoDelay> {
    config: LinConfig,
    channel: &'a mut C,
    transceiver: Option<Transceiver<P, D>>,
}

impl<'a, C: Channel> LinStack<'a, C> {
    /// Creates a stack without transceiver control line.
    pub fn new(channel: &'a mut C, config: LinConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            channel,
            transceiver: None,
        })
    }
}

impl<'a, C: Channel, P: OutputPin, D: DelayNs> LinStack<'a, C, P, D> {
    /// Creates a stack that also drives the transceiver's sleep input.
    ///
    /// The control line is put in normal mode before returning.
    pub fn with_transceiver(
        channel: &'a mut C,
        config: LinConfig,
        mut transceiver: Transceiver<P, D>,
    ) -> Result<Self> {
        config.validate()?;
        transceiver.configure()?;
        Ok(Self {
            config,
            channel,
            transceiver: Some(transceiver),
        })
    }

    pub fn config(&self) -> &LinConfig {
        &self.config
    }

    pub fn ident(&self) -> u8 {
        self.config.ident
    }

    /// Changes the identifier used by [`read`](Self::read) and [`write_stream`](Self::write_stream).
    pub fn set_ident(&mut self, ident: u8) {
        self.config.ident = ident;
    }

    /// Opens the channel at the configured data rate, e.g. before a slave starts listening.
    pub fn setup_serial(&mut self) -> Result<()> {
        self.channel.open(self.config.baud)
    }

    /// Sends the break field.
    pub fn send_break(&mut self) -> Result<()> {
        signaling::send_break(&mut *self.channel, self.config.baud)
    }

    /// Waits for a break on the bus. `Duration::MAX` waits forever.
    pub fn wait_for_break(&mut self, timeout: Duration) -> Result<()> {
        signaling::wait_for_break(&mut *self.channel, timeout)
    }

    /// Sends the wake-up pulse to every node on the bus.
    pub fn send_wake_up(&mut self) -> Result<()> {
        debug!("bus wake-up");
        signaling::send_wake_up(&mut *self.channel, self.config.baud)
    }

    /// Puts the transceiver to sleep (`true`) or back into normal mode (`false`).
    pub fn sleep(&mut self, enter_sleep: bool) -> Result<()> {
        match self.transceiver.as_mut() {
            Some(transceiver) => transceiver.sleep(enter_sleep),
            None => Err(LinError::NotConfigured),
        }
    }

    /// True when `ident` is exactly the configured identifier byte.
    ///
    /// This is an address filter, not a parity check; see
    /// [`has_valid_parity`](crate::data_link::has_valid_parity) for the latter.
    pub fn validate_identifier(&self, ident: u8) -> bool {
        ident == self.config.ident
    }

    /// Sends a whole frame: break, sync, identifier, payload and checksum.
    pub fn write(&mut self, ident: u8, data: &[u8]) -> Result<()> {
        check_payload(data)?;
        debug!(ident, len = data.len(), "write frame");
        self.send_header(ident)?;
        self.channel.write_bytes(data)?;
        self.channel
            .write_byte(frame_checksum(self.config.checksum, ident, data))?;
        self.channel.flush()
    }

    /// Sends a header only; a slave supplies the response.
    pub fn write_request(&mut self, ident: u8) -> Result<()> {
        debug!(ident, "write header");
        self.send_header(ident)?;
        self.channel.flush()
    }

    /// Answers a header already on the bus with payload and checksum.
    pub fn write_response(&mut self, data: &[u8]) -> Result<()> {
        check_payload(data)?;
        debug!(len = data.len(), "write response");
        self.channel.write_bytes(data)?;
        self.channel
            .write_byte(frame_checksum(self.config.checksum, self.config.ident, data))?;
        self.channel.flush()
    }

    /// Sends break, sync, the configured identifier and `data`, without a checksum.
    pub fn write_stream(&mut self, data: &[u8]) -> Result<()> {
        debug!(ident = self.config.ident, len = data.len(), "write stream");
        self.send_header(self.config.ident)?;
        self.channel.write_bytes(data)?;
        self.channel.flush()
    }

    /// Sends a prepared [`LinFrame`] with the configured checksum model.
    pub fn write_frame(&mut self, frame: &LinFrame) -> Result<()> {
        self.write(frame.identifier, &frame.payload)
    }

    /// Reads `[identifier, payload.., checksum]` into `buf` and validates it.
    ///
    /// Returns the number of bytes read. On failure the bytes stay in `buf`.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let read = self.channel.read_bytes(buf)?.min(buf.len());
        let frame = &buf[..read];

        let found = *frame.first().ok_or(LinError::FrameTooShort(0))?;
        if !self.validate_identifier(found) {
            debug!(found, expected = self.config.ident, "identifier mismatch");
            return Err(LinError::IdentifierMismatch {
                expected: self.config.ident,
                found,
            });
        }
        if read < 2 {
            return Err(LinError::FrameTooShort(read));
        }
        verify_checksum(self.config.checksum, found, &frame[1..]).inspect_err(|e| {
            debug!(error = %e, "frame rejected");
        })?;

        debug!(ident = found, len = read, "read frame");
        Ok(read)
    }

    /// Reads a validated frame into a [`LinFrame`].
    pub fn read_frame(&mut self) -> Result<LinFrame> {
        let mut buf = [0u8; LIN_MAX_PAYLOAD + 2];
        let read = self.read(&mut buf)?;
        LinFrame::decode(&buf[..read], self.config.checksum)
    }

    /// Raw read, no validation.
    pub fn read_stream(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.channel.read_bytes(buf)
    }

    /// Gives back the transceiver, if one was attached.
    pub fn release(self) -> Option<Transceiver<P, D>> {
        self.transceiver
    }

    fn send_header(&mut self, ident: u8) -> Result<()> {
        self.send_break()?;
        self.channel.write_byte(LIN_SYNC_BYTE)?;
        self.channel.write_byte(ident)
    }
}

fn check_payload(data: &[u8]) -> Result<()> {
    if data.len() > LIN_MAX_PAYLOAD {
        return Err(LinError::PayloadTooLong(data.len()));
    }
    Ok(())
}
