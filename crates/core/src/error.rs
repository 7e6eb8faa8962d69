//! Error types for razer-hid-core.

use crate::report::status_name;
use thiserror::Error;

/// Core library error type.
///
/// Only decoding of received reports (and the transport itself) can fail;
/// report builders are infallible.
#[derive(Debug, Error)]
pub enum Error {
    /// HID transport failure (write/read error, short transfer).
    #[error("HID error: {0}")]
    Hid(String),

    /// Received buffer is not a full report.
    #[error("invalid report length: got {actual} bytes, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },

    /// Checksum over bytes 2..88 does not match the received CRC byte.
    #[error("checksum mismatch: computed 0x{expected:02X}, report carries 0x{actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },

    /// Device answered with a non-successful status byte.
    #[error("device reported status 0x{status:02X} ({})", status_name(*.status))]
    DeviceStatus { status: u8 },

    /// Response header does not belong to the request that was sent.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Enumerated field carries a value with no known mapping.
    #[error("unrecognized {field} value: 0x{value:02X}")]
    UnrecognizedValue { field: &'static str, value: u32 },
}

impl Error {
    /// Raw device status code, if this error came from a status byte.
    pub fn device_status(&self) -> Option<u8> {
        match self {
            Self::DeviceStatus { status } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
