//! HID transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface. The transport only moves bytes;
//! checksums and status handling stay in [`crate::report`].

use crate::error::{Error, Result};
use crate::report::{Report, REPORT_LEN};
use std::time::Duration;
use tracing::trace;

/// Abstraction over one synchronous report exchange.
///
/// Implementations send exactly one 90-byte report and return the device's
/// 90-byte answer. Pairing, timeouts and serialization of access to the
/// physical device are the implementation's business.
pub trait HidTransport: Send {
    /// Write a report and return the response.
    fn send_report(&self, report: &[u8; REPORT_LEN]) -> Result<[u8; REPORT_LEN]>;
}

/// Send a report and return the raw answer.
///
/// The transport is called exactly once. The answer is not validated here;
/// command parsers do that against the command they expect.
pub fn transfer(transport: &dyn HidTransport, request: &Report) -> Result<[u8; REPORT_LEN]> {
    let encoded = request.to_bytes();
    trace!(
        command_class = format_args!("0x{:02X}", request.command_class),
        command_id = format_args!("0x{:02X}", request.command_id.to_byte()),
        report_hex = format_args!("{:02X?}", &encoded[..]),
        "Razer TX"
    );

    let raw = transport.send_report(&encoded)?;

    trace!(
        status = format_args!("0x{:02X}", raw[0]),
        report_hex = format_args!("{:02X?}", &raw[..]),
        "Razer RX"
    );
    Ok(raw)
}

/// Delay between writing a request and reading the answer.
pub const RESPONSE_DELAY: Duration = Duration::from_millis(7);

/// Report ID prefixed to feature report buffers. Razer mice use report 0.
const FEATURE_REPORT_ID: u8 = 0x00;

/// Transport over an already-opened hidapi device using feature reports.
///
/// Opening, selecting and reconnecting the device stay with the caller.
pub struct HidapiTransport {
    device: hidapi::HidDevice,
    response_delay: Duration,
}

impl HidapiTransport {
    pub fn new(device: hidapi::HidDevice) -> Self {
        Self {
            device,
            response_delay: RESPONSE_DELAY,
        }
    }

    /// Override the write→read delay.
    pub fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }
}

impl HidTransport for HidapiTransport {
    fn send_report(&self, report: &[u8; REPORT_LEN]) -> Result<[u8; REPORT_LEN]> {
        self.device
            .send_feature_report(&feature_buffer(report))
            .map_err(|e| Error::Hid(format!("send_feature_report: {e}")))?;

        std::thread::sleep(self.response_delay);

        let mut response = [0u8; REPORT_LEN + 1];
        response[0] = FEATURE_REPORT_ID;
        let n = self
            .device
            .get_feature_report(&mut response)
            .map_err(|e| Error::Hid(format!("get_feature_report: {e}")))?;

        strip_report_id(&response[..n])
    }
}

/// Prefix a report with the feature report ID.
fn feature_buffer(report: &[u8; REPORT_LEN]) -> [u8; REPORT_LEN + 1] {
    let mut buf = [0u8; REPORT_LEN + 1];
    buf[0] = FEATURE_REPORT_ID;
    buf[1..].copy_from_slice(report);
    buf
}

/// Drop the leading report ID from a feature report read.
fn strip_report_id(data: &[u8]) -> Result<[u8; REPORT_LEN]> {
    if data.len() != REPORT_LEN + 1 {
        return Err(Error::Hid(format!(
            "short feature report: got {} bytes, expected {}",
            data.len(),
            REPORT_LEN + 1
        )));
    }
    let mut report = [0u8; REPORT_LEN];
    report.copy_from_slice(&data[1..]);
    Ok(report)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{build_report, class, CommandId};

    #[test]
    fn transfer_calls_transport_once() {
        let mock = mock::MockTransport::new();
        let req = build_report(class::POWER, CommandId::get(0x00), 0x02).finalize();
        mock.on_report(&req, &[0x00, 0xFF]);

        let raw = transfer(&mock, &req).unwrap();
        assert_eq!(mock.call_count(), 1);
        assert_eq!(raw[0], 0x02);
        assert_eq!(raw[9], 0xFF);
    }

    #[test]
    fn transfer_surfaces_transport_errors() {
        let mock = mock::MockTransport::new();
        let req = build_report(class::POWER, CommandId::get(0x04), 0x02).finalize();
        let err = transfer(&mock, &req).unwrap_err();
        assert!(matches!(err, Error::Hid(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn feature_buffer_prefixes_report_id() {
        let mut report = [0u8; REPORT_LEN];
        report[0] = 0xAB;
        report[REPORT_LEN - 1] = 0xCD;
        let buf = feature_buffer(&report);
        assert_eq!(buf.len(), REPORT_LEN + 1);
        assert_eq!(buf[0], FEATURE_REPORT_ID);
        assert_eq!(buf[1], 0xAB);
        assert_eq!(buf[REPORT_LEN], 0xCD);
    }

    #[test]
    fn strip_report_id_roundtrip() {
        let mut report = [0u8; REPORT_LEN];
        report[5] = 0x07;
        let stripped = strip_report_id(&feature_buffer(&report)).unwrap();
        assert_eq!(stripped, report);
    }

    #[test]
    fn strip_report_id_rejects_short_read() {
        assert!(strip_report_id(&[0u8; 10]).is_err());
        assert!(strip_report_id(&[0u8; REPORT_LEN]).is_err());
    }
}
