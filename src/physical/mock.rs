use std::collections::VecDeque;

use super::{Channel, LineStatus};
use crate::error::{LinError, Result};
use crate::types::Baud;

/// One call made on a [`MockChannel`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent {
    Open(Baud),
    Write(u8),
    Flush,
}

/// Mock UART for testing
///
/// Records every call, serves reads from a queue and reports a scriptable
/// line status.
#[derive(Debug, Default)]
pub struct MockChannel {
    events: Vec<ChannelEvent>,
    rx: VecDeque<u8>,
    baud: Option<Baud>,
    status: LineStatus,
    break_after: Option<usize>,
    polls: usize,
    echo: bool,
    error: Option<String>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that reads back what it transmits, like a transceiver's RX line
    pub fn new_echo() -> Self {
        Self {
            echo: true,
            ..Self::default()
        }
    }

    /// Creates a mock whose every operation fails
    pub fn new_error() -> Self {
        Self {
            error: Some("mock channel failure".to_string()),
            ..Self::default()
        }
    }

    /// Queues bytes for the next reads
    pub fn push_rx(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    pub fn set_line_status(&mut self, status: LineStatus) {
        self.status = status;
    }

    /// Reports a framing error once more than `polls` status polls have been made
    pub fn break_after(&mut self, polls: usize) {
        self.break_after = Some(polls);
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn events(&self) -> &[ChannelEvent] {
        &self.events
    }

    /// Every byte transmitted so far, in order
    pub fn written(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ChannelEvent::Write(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }

    /// Data rate the channel was last opened at
    pub fn baud(&self) -> Option<Baud> {
        self.baud
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.rx.clear();
    }

    fn check(&self) -> Result<()> {
        match &self.error {
            Some(msg) => Err(LinError::Channel(msg.clone())),
            None => Ok(()),
        }
    }
}

impl Channel for MockChannel {
    fn open(&mut self, baud: Baud) -> Result<()> {
        self.check()?;
        self.baud = Some(baud);
        self.events.push(ChannelEvent::Open(baud));
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.check()?;
        self.events.push(ChannelEvent::Write(byte));
        if self.echo {
            self.rx.push_back(byte);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.check()?;
        self.events.push(ChannelEvent::Flush);
        Ok(())
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.check()?;
        let count = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }

    fn line_status(&mut self) -> LineStatus {
        self.polls += 1;
        match self.break_after {
            Some(limit) if self.polls > limit => self.status | LineStatus::FRAMING_ERROR,
            _ => self.status,
        }
    }
}
