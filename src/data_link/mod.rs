//! LIN frame codec.
//!
//! A LIN frame on the wire is laid out as:
//!
//! ```text
//!  ___________ __________ _______ ____________ _________
//! |           |          |       |            |         |
//! |Synch Break|Synch Byte|ID byte| Data Bytes |Checksum |
//! |___________|__________|_______|____________|_________|
//! ```
//!
//! The break is produced by the physical layer. This module covers the
//! bytes that follow it: identifier parity, the inverted 8-bit checksum
//! and validation of received frames.

use crate::error::{LinError, Result};
use crate::types::Address;

// LIN constants
pub const LIN_SYNC_BYTE: u8 = 0x55;
pub const LIN_BREAK_BYTE: u8 = 0x00;
pub const LIN_ID_MASK: u8 = 0x3F;
pub const LIN_P0_FLAG: u8 = 6;
pub const LIN_P1_FLAG: u8 = 7;
pub const LIN_MAX_PAYLOAD: usize = 8;

/// Which bytes the checksum byte covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumModel {
    /// Payload bytes only (LIN 1.x)
    #[default]
    Classic,
    /// Protected identifier plus payload bytes (LIN 2.x)
    Enhanced,
}

/// Inverted mod-256 sum of `data`.
///
/// An empty slice yields `0xFF`.
pub fn compute_checksum(data: &[u8]) -> u8 {
    !sum(0, data)
}

/// Checksum under `model` for a frame carrying `identifier`.
pub fn frame_checksum(model: ChecksumModel, identifier: u8, payload: &[u8]) -> u8 {
    match model {
        ChecksumModel::Classic => compute_checksum(payload),
        ChecksumModel::Enhanced => !sum(identifier, payload),
    }
}

/// Checks a payload followed by its classic checksum byte.
///
/// Returns `false` for an empty slice, since there is no checksum byte to compare.
pub fn validate_checksum(data: &[u8]) -> bool {
    match data.split_last() {
        Some((&received, payload)) => compute_checksum(payload) == received,
        None => false,
    }
}

/// Like [`validate_checksum`], but under `model` and reporting what went wrong.
pub fn verify_checksum(model: ChecksumModel, identifier: u8, data: &[u8]) -> Result<()> {
    let (&found, payload) = data.split_last().ok_or(LinError::FrameTooShort(data.len()))?;
    let expected = frame_checksum(model, identifier, payload);
    if expected != found {
        return Err(LinError::ChecksumMismatch { expected, found });
    }
    Ok(())
}

/// Parity bits P0 (bit 6) and P1 (bit 7) for a 6-bit address.
pub fn identifier_parity(address: Address) -> u8 {
    let bit = |n: u8| (address >> n) & 1;
    let p0 = bit(0) ^ bit(1) ^ bit(2) ^ bit(4);
    let p1 = !(bit(1) ^ bit(3) ^ bit(4) ^ bit(5)) & 1;
    (p0 << LIN_P0_FLAG) | (p1 << LIN_P1_FLAG)
}

/// Packs a 6-bit address and its parity into a protected identifier byte.
pub fn generate_identifier(address: Address) -> u8 {
    (address & LIN_ID_MASK) | identifier_parity(address & LIN_ID_MASK)
}

/// True when the top two bits of `identifier` match the parity of its address bits.
pub fn has_valid_parity(identifier: u8) -> bool {
    generate_identifier(identifier & LIN_ID_MASK) == identifier
}

fn sum(seed: u8, data: &[u8]) -> u8 {
    data.iter().fold(seed, |acc, &byte| acc.wrapping_add(byte))
}

/// A LIN frame as carried after the break field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinFrame {
    pub identifier: u8,
    pub payload: Vec<u8>,
}

impl LinFrame {
    /// Builds a frame with an already protected identifier byte.
    pub fn new(identifier: u8, payload: &[u8]) -> Result<Self> {
        if payload.len() > LIN_MAX_PAYLOAD {
            return Err(LinError::PayloadTooLong(payload.len()));
        }
        Ok(Self {
            identifier,
            payload: payload.to_vec(),
        })
    }

    /// Builds a frame from a 6-bit address, adding the parity bits.
    pub fn from_address(address: Address, payload: &[u8]) -> Result<Self> {
        if address > LIN_ID_MASK {
            return Err(LinError::InvalidParameter);
        }
        Self::new(generate_identifier(address), payload)
    }

    pub fn address(&self) -> Address {
        self.identifier & LIN_ID_MASK
    }

    pub fn checksum(&self, model: ChecksumModel) -> u8 {
        frame_checksum(model, self.identifier, &self.payload)
    }

    /// Wire bytes following the break: sync, identifier, payload, checksum.
    pub fn encode(&self, model: ChecksumModel) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.payload.len() + 3);
        bytes.push(LIN_SYNC_BYTE);
        bytes.push(self.identifier);
        bytes.extend_from_slice(&self.payload);
        bytes.push(self.checksum(model));
        bytes
    }

    /// Parses `[identifier, payload.., checksum]` as handed over by the UART.
    pub fn decode(bytes: &[u8], model: ChecksumModel) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(LinError::FrameTooShort(bytes.len()));
        }
        let identifier = bytes[0];
        let body = &bytes[1..];
        verify_checksum(model, identifier, body)?;
        Self::new(identifier, &body[..body.len() - 1])
    }
}
