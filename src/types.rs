/// UART data rate in bits per second
pub type Baud = u32;

/// 6-bit LIN frame address (0x00..=0x3F)
pub type Address = u8;

/// Configuration trait that must be implemented by all protocol configurations
pub trait Config: Send + Sync {
    fn validate(&self) -> crate::error::Result<()>;
}
