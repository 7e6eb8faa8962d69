//! Razer 90-byte report layout, checksum, and header field types.
//!
//! Every exchange with the device is one fixed-size report:
//!
//! | Bytes  | Field              | Notes                                  |
//! |--------|--------------------|----------------------------------------|
//! | 0      | status             | 0x00 for requests, set by device       |
//! | 1      | transaction ID     | device:3 (high) / id:5 (low)           |
//! | 2..4   | remaining packets  | big-endian, 0 for single-packet cmds   |
//! | 4      | protocol type      | always 0x00                            |
//! | 5      | data size          | meaningful argument bytes              |
//! | 6      | command class      | functional group                       |
//! | 7      | command ID         | direction:1 (high) / number:7 (low)    |
//! | 8..88  | arguments          | zero-padded                            |
//! | 88     | CRC                | XOR of bytes 2..88                     |
//! | 89     | reserved           | always 0x00                            |
//!
//! Protocol reference: OpenRazer (GPLv2, protocol knowledge only).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::warn;

/// Report length on the wire. Fixed by device firmware.
pub const REPORT_LEN: usize = 0x5A;
/// Length of the argument region.
pub const ARGUMENTS_LEN: usize = 80;

const ARGUMENTS_OFFSET: usize = 8;
const CRC_INDEX: usize = 88;
const RESERVED_INDEX: usize = 89;

/// Byte range folded into the checksum: everything after the transaction ID
/// up to (not including) the CRC byte.
pub const CRC_RANGE: Range<usize> = 2..CRC_INDEX;

/// Transaction ID used by the Basilisk X HyperSpeed.
pub const DEFAULT_TRANSACTION_ID: u8 = 0x1F;

/// Command classes.
pub mod class {
    /// Device / firmware / polling rate.
    pub const DEVICE: u8 = 0x00;
    /// Sensor DPI.
    pub const DPI: u8 = 0x04;
    /// Battery and charging.
    pub const POWER: u8 = 0x07;
}

/// Report status byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    NewCommand = 0x00,
    Busy = 0x01,
    Successful = 0x02,
    Failure = 0x03,
    Timeout = 0x04,
    NotSupported = 0x05,
}

impl Status {
    /// Look up a status from its wire byte.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::NewCommand),
            0x01 => Some(Self::Busy),
            0x02 => Some(Self::Successful),
            0x03 => Some(Self::Failure),
            0x04 => Some(Self::Timeout),
            0x05 => Some(Self::NotSupported),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NewCommand => "new command",
            Self::Busy => "busy",
            Self::Successful => "successful",
            Self::Failure => "failure",
            Self::Timeout => "timeout",
            Self::NotSupported => "not supported",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Name of a raw status code, `"unknown"` for codes outside the table.
pub fn status_name(code: u8) -> &'static str {
    Status::from_byte(code).map_or("unknown", |s| s.name())
}

/// Transaction ID byte: 3-bit device index in bits 7:5, 5-bit id in bits 4:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(u8);

impl TransactionId {
    /// Full byte 0x1F: device 0, id 0x1F.
    pub const DEFAULT: Self = Self(DEFAULT_TRANSACTION_ID);

    /// Pack a device index and id. Out-of-range bits are masked off.
    pub const fn new(device: u8, id: u8) -> Self {
        Self(((device & 0x07) << 5) | (id & 0x1F))
    }

    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub const fn to_byte(self) -> u8 {
        self.0
    }

    pub const fn device(self) -> u8 {
        self.0 >> 5
    }

    pub const fn id(self) -> u8 {
        self.0 & 0x1F
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Command ID byte: direction in bit 7 (set = get, device-to-host),
/// command number in bits 6:0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u8);

impl CommandId {
    const DIRECTION_BIT: u8 = 0x80;

    /// A host-to-device ("set") command.
    pub const fn set(number: u8) -> Self {
        Self(number & 0x7F)
    }

    /// A device-to-host ("get") command.
    pub const fn get(number: u8) -> Self {
        Self(Self::DIRECTION_BIT | (number & 0x7F))
    }

    pub const fn from_byte(byte: u8) -> Self {
        Self(byte)
    }

    pub const fn to_byte(self) -> u8 {
        self.0
    }

    pub const fn is_get(self) -> bool {
        self.0 & Self::DIRECTION_BIT != 0
    }

    pub const fn number(self) -> u8 {
        self.0 & 0x7F
    }
}

/// Variable storage flag carried in the first argument of settings commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum VariableStorage {
    /// Apply transiently.
    NoStore = crate::NOSTORE,
    /// Persist on the device.
    VarStore = crate::VARSTORE,
}

impl VariableStorage {
    pub fn to_byte(self) -> u8 {
        self as u8
    }
}

/// One protocol exchange, request or response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub status: u8,
    pub transaction_id: TransactionId,
    pub remaining_packets: u16,
    pub protocol_type: u8,
    pub data_size: u8,
    pub command_class: u8,
    pub command_id: CommandId,
    pub arguments: [u8; ARGUMENTS_LEN],
    pub crc: u8,
    pub reserved: u8,
}

/// Base report for a command, all other bytes zero.
///
/// This is the only construction path for outgoing reports. The CRC is left
/// at zero; callers fill arguments and then [`Report::finalize`].
pub fn build_report(command_class: u8, command_id: CommandId, data_size: u8) -> Report {
    Report {
        status: Status::NewCommand.to_byte(),
        transaction_id: TransactionId::DEFAULT,
        remaining_packets: 0x0000,
        protocol_type: 0x00,
        data_size,
        command_class,
        command_id,
        arguments: [0u8; ARGUMENTS_LEN],
        crc: 0x00,
        reserved: 0x00,
    }
}

/// XOR of the checksum range of a flat report image.
pub fn checksum(bytes: &[u8; REPORT_LEN]) -> u8 {
    bytes[CRC_RANGE].iter().fold(0u8, |acc, &b| acc ^ b)
}

impl Report {
    /// Flat wire image.
    pub fn to_bytes(&self) -> [u8; REPORT_LEN] {
        let mut buf = [0u8; REPORT_LEN];
        buf[0] = self.status;
        buf[1] = self.transaction_id.to_byte();
        buf[2..4].copy_from_slice(&self.remaining_packets.to_be_bytes());
        buf[4] = self.protocol_type;
        buf[5] = self.data_size;
        buf[6] = self.command_class;
        buf[7] = self.command_id.to_byte();
        buf[ARGUMENTS_OFFSET..CRC_INDEX].copy_from_slice(&self.arguments);
        buf[CRC_INDEX] = self.crc;
        buf[RESERVED_INDEX] = self.reserved;
        buf
    }

    /// Structural parse of a received buffer. Nothing is validated beyond
    /// the length; see [`Report::validate_response`].
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() != REPORT_LEN {
            return Err(Error::InvalidLength {
                expected: REPORT_LEN,
                actual: data.len(),
            });
        }

        let mut arguments = [0u8; ARGUMENTS_LEN];
        arguments.copy_from_slice(&data[ARGUMENTS_OFFSET..CRC_INDEX]);

        Ok(Self {
            status: data[0],
            transaction_id: TransactionId::from_byte(data[1]),
            remaining_packets: u16::from_be_bytes([data[2], data[3]]),
            protocol_type: data[4],
            data_size: data[5],
            command_class: data[6],
            command_id: CommandId::from_byte(data[7]),
            arguments,
            crc: data[CRC_INDEX],
            reserved: data[RESERVED_INDEX],
        })
    }

    /// Checksum over the current field values.
    pub fn calculate_crc(&self) -> u8 {
        checksum(&self.to_bytes())
    }

    /// Set the CRC byte from the current field values.
    pub fn finalize(mut self) -> Self {
        self.crc = self.calculate_crc();
        self
    }

    pub fn has_valid_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }

    /// Decoded status byte.
    pub fn status(&self) -> Option<Status> {
        Status::from_byte(self.status)
    }

    /// Argument bytes covered by `data_size`, capped at the argument region.
    pub fn payload(&self) -> &[u8] {
        let len = (self.data_size as usize).min(ARGUMENTS_LEN);
        &self.arguments[..len]
    }

    /// Check a received report before any argument byte is trusted.
    ///
    /// Order: checksum, status, then every header field must match the
    /// request: transaction ID, command class and ID, protocol type 0x00,
    /// no remaining packets. `data_size` must fit the argument region and
    /// cover at least `min_data_size` bytes. Returns [`Report::payload`].
    pub fn validate_response(&self, request: &Report, min_data_size: u8) -> Result<&[u8]> {
        let computed = self.calculate_crc();
        if computed != self.crc {
            warn!(
                computed = format_args!("0x{:02X}", computed),
                received = format_args!("0x{:02X}", self.crc),
                "Report checksum mismatch"
            );
            return Err(Error::ChecksumMismatch {
                expected: computed,
                actual: self.crc,
            });
        }

        if self.status() != Some(Status::Successful) {
            warn!(
                status = format_args!("0x{:02X}", self.status),
                name = status_name(self.status),
                "Device rejected command"
            );
            return Err(Error::DeviceStatus {
                status: self.status,
            });
        }

        if self.transaction_id != request.transaction_id {
            return Err(Error::UnexpectedResponse(format!(
                "transaction id 0x{:02X}, expected 0x{:02X}",
                self.transaction_id.to_byte(),
                request.transaction_id.to_byte()
            )));
        }

        if self.command_class != request.command_class || self.command_id != request.command_id {
            return Err(Error::UnexpectedResponse(format!(
                "expected class 0x{:02X} id 0x{:02X}, got class 0x{:02X} id 0x{:02X}",
                request.command_class,
                request.command_id.to_byte(),
                self.command_class,
                self.command_id.to_byte()
            )));
        }

        if self.protocol_type != 0x00 {
            return Err(Error::UnexpectedResponse(format!(
                "protocol type 0x{:02X}, expected 0x00",
                self.protocol_type
            )));
        }

        if self.remaining_packets != 0 {
            return Err(Error::UnexpectedResponse(format!(
                "{} remaining packets on a single-packet command",
                self.remaining_packets
            )));
        }

        if self.data_size as usize > ARGUMENTS_LEN {
            return Err(Error::UnexpectedResponse(format!(
                "data size {} exceeds {} argument bytes",
                self.data_size, ARGUMENTS_LEN
            )));
        }

        if self.data_size < min_data_size {
            return Err(Error::UnexpectedResponse(format!(
                "data size {} below the {} bytes this command returns",
                self.data_size, min_data_size
            )));
        }

        Ok(self.payload())
    }
}

/// Parse and validate a received buffer as the answer to `request`.
pub fn decode_response(raw: &[u8], request: &Report, min_data_size: u8) -> Result<Report> {
    let report = Report::from_bytes(raw)?;
    report.validate_response(request, min_data_size)?;
    Ok(report)
}
