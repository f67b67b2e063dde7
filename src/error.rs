// Accelink - Error Types

use thiserror::Error;

/// Failure of a single register transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("device did not acknowledge")]
    NoAck,
    #[error("bus transaction timed out")]
    Timeout,
    #[error("bus driver error {0}")]
    Other(i32),
}

/// Failure of an HTTP exchange with the collector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("could not connect to collector")]
    ConnectFailed,
    #[error("collector request timed out")]
    Timeout,
    #[error("transport error {0}")]
    Other(i32),
    #[error("collector answered with HTTP {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Append attempted on a full batch without an intervening reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("sample buffer overflow (capacity {capacity})")]
pub struct BufferOverflow {
    pub capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartupError {
    #[error("device ID 0x{found:02X} not recognized (expected 0x{expected:02X})")]
    IdentityMismatch { found: u8, expected: u8 },
    #[error("sensor configuration failed: {0}")]
    Bus(#[from] BusError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SamplerError {
    #[error(transparent)]
    Overflow(#[from] BufferOverflow),
    #[error("sampler is not running")]
    NotRunning,
}
