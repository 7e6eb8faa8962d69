//! Polling rate read/write (command class 0x00).
//!
//! Commands:
//!   - 0x05 setPollingRate: args[0] = rate code
//!   - 0x85 getPollingRate → response args[0] = rate code
//!
//! Rate code: 0x01 = 1000 Hz, 0x02 = 500 Hz, 0x08 = 125 Hz (report interval in ms).

use crate::device::PollingRate;
use crate::error::{Error, Result};
use crate::report::{build_report, class, decode_response, CommandId, Report};
use crate::safety;
use crate::transport::{transfer, HidTransport};
use tracing::debug;

pub const SET_POLLING_RATE: CommandId = CommandId::set(0x05);
pub const GET_POLLING_RATE: CommandId = CommandId::get(0x05);

const POLLING_RATE_DATA_SIZE: u8 = 0x01;

/// Convert a PollingRate to the device's rate code.
pub fn rate_to_code(rate: PollingRate) -> u8 {
    match rate {
        PollingRate::Hz1000 => 0x01,
        PollingRate::Hz500 => 0x02,
        PollingRate::Hz125 => 0x08,
    }
}

/// Convert a device rate code back to PollingRate.
pub fn code_to_rate(code: u8) -> Result<PollingRate> {
    match code {
        0x01 => Ok(PollingRate::Hz1000),
        0x02 => Ok(PollingRate::Hz500),
        0x08 => Ok(PollingRate::Hz125),
        other => Err(Error::UnrecognizedValue {
            field: "polling_rate",
            value: other as u32,
        }),
    }
}

/// Build a setPollingRate report. Unsupported rates encode as 500 Hz.
pub fn build_set_polling_rate(hz: u16) -> Report {
    let mut report = build_report(class::DEVICE, SET_POLLING_RATE, POLLING_RATE_DATA_SIZE);
    report.arguments[0] = rate_to_code(safety::normalize_polling_rate(hz));
    report.finalize()
}

/// Build a getPollingRate report.
pub fn build_get_polling_rate() -> Report {
    build_report(class::DEVICE, GET_POLLING_RATE, POLLING_RATE_DATA_SIZE).finalize()
}

/// Decode the answer to a getPollingRate `request`.
pub fn parse_polling_rate(request: &Report, raw: &[u8]) -> Result<PollingRate> {
    let response = decode_response(raw, request, POLLING_RATE_DATA_SIZE)?;
    code_to_rate(response.payload()[0])
}

/// Read the current polling rate from the device.
pub fn read_polling_rate(transport: &dyn HidTransport) -> Result<PollingRate> {
    let request = build_get_polling_rate();
    let raw = transfer(transport, &request)?;
    let rate = parse_polling_rate(&request, &raw)?;
    debug!(rate = rate.as_hz(), "Polling rate read");
    Ok(rate)
}

/// Write a polling rate to the device. Returns the rate actually encoded.
pub fn write_polling_rate(transport: &dyn HidTransport, hz: u16) -> Result<PollingRate> {
    let rate = safety::normalize_polling_rate(hz);
    let request = build_set_polling_rate(rate.as_hz());
    let raw = transfer(transport, &request)?;
    decode_response(&raw, &request, 0)?;
    debug!(rate = rate.as_hz(), "Polling rate written");
    Ok(rate)
}
