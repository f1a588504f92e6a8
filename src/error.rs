use embedded_hal::digital::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum LinError {
    // Frame validation errors
    #[error("identifier mismatch: expected {expected:#04x}, found {found:#04x}")]
    IdentifierMismatch { expected: u8, found: u8 },
    #[error("checksum mismatch: expected {expected:#04x}, found {found:#04x}")]
    ChecksumMismatch { expected: u8, found: u8 },
    #[error("frame too short ({0} bytes)")]
    FrameTooShort(usize),
    #[error("payload too long ({0} bytes, max 8)")]
    PayloadTooLong(usize),

    // Bus errors
    #[error("Operation timed out")]
    Timeout,
    #[error("Channel error: {0}")]
    Channel(String),

    // Transceiver errors
    #[error("Control line error: {0:?}")]
    Pin(ErrorKind),
    #[error("No control line configured")]
    NotConfigured,

    // Generic errors
    #[error("Invalid parameter")]
    InvalidParameter,
}

pub type Result<T> = std::result::Result<T, LinError>;
