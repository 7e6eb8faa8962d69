//! Firmware version and serial number (command class 0x00).
//!
//! Commands:
//!   - 0x81 getFirmwareVersion (data size 2) → args[0] = major, args[1] = minor
//!   - 0x82 getSerial (data size 22) → args[0..22] = ASCII, NUL-padded

use crate::error::{Error, Result};
use crate::report::{build_report, class, decode_response, CommandId, Report, TransactionId};
use crate::transport::{transfer, HidTransport};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GET_FIRMWARE_VERSION: CommandId = CommandId::get(0x01);
pub const GET_SERIAL: CommandId = CommandId::get(0x02);

const FIRMWARE_DATA_SIZE: u8 = 0x02;
/// Serial number length in bytes.
pub const SERIAL_LEN: u8 = 0x16;

/// Firmware version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
}

impl std::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// Static device identification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub firmware: FirmwareVersion,
    pub serial: String,
}

/// Build a getFirmwareVersion report.
pub fn build_get_firmware_version() -> Report {
    let mut report = build_report(class::DEVICE, GET_FIRMWARE_VERSION, FIRMWARE_DATA_SIZE);
    // Firmware query must carry transaction ID 0x1F on this device.
    report.transaction_id = TransactionId::DEFAULT;
    report.finalize()
}

/// Build a getSerial report.
pub fn build_get_serial() -> Report {
    build_report(class::DEVICE, GET_SERIAL, SERIAL_LEN).finalize()
}

/// Decode the answer to a getFirmwareVersion `request`.
pub fn parse_firmware_version(request: &Report, raw: &[u8]) -> Result<FirmwareVersion> {
    let response = decode_response(raw, request, FIRMWARE_DATA_SIZE)?;
    let args = response.payload();
    Ok(FirmwareVersion {
        major: args[0],
        minor: args[1],
    })
}

/// Decode the answer to a getSerial `request`.
///
/// The serial ends at the first NUL. Any non-printable ASCII byte before
/// that rejects the whole response.
pub fn parse_serial(request: &Report, raw: &[u8]) -> Result<String> {
    let response = decode_response(raw, request, SERIAL_LEN)?;
    let field = &response.payload()[..SERIAL_LEN as usize];
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());

    let mut serial = String::with_capacity(end);
    for &b in &field[..end] {
        if !(b.is_ascii_graphic() || b == b' ') {
            return Err(Error::UnrecognizedValue {
                field: "serial",
                value: b as u32,
            });
        }
        serial.push(b as char);
    }
    Ok(serial.trim_end().to_string())
}

/// Read the firmware version.
pub fn read_firmware_version(transport: &dyn HidTransport) -> Result<FirmwareVersion> {
    let request = build_get_firmware_version();
    let raw = transfer(transport, &request)?;
    let version = parse_firmware_version(&request, &raw)?;
    debug!(%version, "Firmware version read");
    Ok(version)
}

/// Read the serial number.
pub fn read_serial(transport: &dyn HidTransport) -> Result<String> {
    let request = build_get_serial();
    let raw = transfer(transport, &request)?;
    let serial = parse_serial(&request, &raw)?;
    debug!(serial = %serial, "Serial number read");
    Ok(serial)
}

/// Read firmware version and serial number.
pub fn read_device_info(transport: &dyn HidTransport) -> Result<DeviceInfo> {
    Ok(DeviceInfo {
        firmware: read_firmware_version(transport)?,
        serial: read_serial(transport)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Status;
    use crate::transport::mock::MockTransport;

    #[test]
    fn firmware_version_report() {
        let report = build_get_firmware_version();
        let bytes = report.to_bytes();
        assert_eq!(bytes[1], 0x1F);
        assert_eq!(bytes[5], 0x02);
        assert_eq!(bytes[6], 0x00);
        assert_eq!(bytes[7], 0x81);
        assert!(report.has_valid_crc());
    }

    #[test]
    fn serial_report() {
        let report = build_get_serial();
        assert_eq!(report.data_size, 22);
        assert_eq!(report.command_class, 0x00);
        assert_eq!(report.command_id.to_byte(), 0x82);
        assert!(report.arguments.iter().all(|&b| b == 0));
        assert!(report.has_valid_crc());
    }

    #[test]
    fn read_firmware_version_value() {
        let mock = MockTransport::new();
        mock.on_report(&build_get_firmware_version(), &[0x01, 0x07]);

        let version = read_firmware_version(&mock).unwrap();
        assert_eq!(version, FirmwareVersion { major: 1, minor: 7 });
        assert_eq!(version.to_string(), "v1.7");
    }

    #[test]
    fn read_serial_stops_at_nul() {
        let mock = MockTransport::new();
        mock.on_report(&build_get_serial(), b"PM2013H12345678\0\0\0");

        assert_eq!(read_serial(&mock).unwrap(), "PM2013H12345678");
    }

    #[test]
    fn read_serial_full_width() {
        let mock = MockTransport::new();
        mock.on_report(&build_get_serial(), b"ABCDEFGHIJKLMNOPQRSTUV");

        assert_eq!(read_serial(&mock).unwrap().len(), 22);
    }

    #[test]
    fn read_serial_rejects_binary() {
        let mock = MockTransport::new();
        mock.on_report(&build_get_serial(), &[b'P', b'M', 0xFF, b'1']);

        let err = read_serial(&mock).unwrap_err();
        assert!(matches!(
            err,
            Error::UnrecognizedValue {
                field: "serial",
                value: 0xFF
            }
        ));
    }

    #[test]
    fn parse_serial_rejects_truncated_data_size() {
        let request = build_get_serial();
        let mut resp = request.clone();
        resp.status = Status::Successful.to_byte();
        resp.data_size = 8;
        resp.arguments[..8].copy_from_slice(b"PM2013H1");
        let raw = resp.finalize().to_bytes();

        assert!(matches!(
            parse_serial(&request, &raw),
            Err(Error::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn parse_firmware_version_rejects_other_transaction_id() {
        let request = build_get_firmware_version();
        let mut resp = request.clone();
        resp.status = Status::Successful.to_byte();
        resp.transaction_id = TransactionId::from_byte(0xFF);
        resp.arguments[..2].copy_from_slice(&[0x01, 0x07]);
        let raw = resp.finalize().to_bytes();

        assert!(matches!(
            parse_firmware_version(&request, &raw),
            Err(Error::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn read_device_info_combines_both() {
        let mock = MockTransport::new();
        mock.on_report(&build_get_firmware_version(), &[0x02, 0x01]);
        mock.on_report(&build_get_serial(), b"XY0000000001");

        let info = read_device_info(&mock).unwrap();
        assert_eq!(info.firmware, FirmwareVersion { major: 2, minor: 1 });
        assert_eq!(info.serial, "XY0000000001");
        assert_eq!(mock.call_count(), 2);
    }

    #[test]
    fn read_device_info_fails_whole() {
        let mock = MockTransport::new();
        mock.on_report(&build_get_firmware_version(), &[0x02, 0x01]);
        mock.on_report_with_status(&build_get_serial(), Status::NotSupported, &[]);

        assert!(read_device_info(&mock).is_err());
    }
}
