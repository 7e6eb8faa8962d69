//! Sensor DPI read/write (command class 0x04).
//!
//! Commands:
//!   - 0x05 setDpiXY: args[0] = storage, args[1..3] = X, args[3..5] = Y (big-endian)
//!   - 0x85 getDpiXY: args[0] = storage → response args[1..3] = X, args[3..5] = Y
//!
//! Both use data size 7; args[5..7] are always zero.

use crate::error::Result;
use crate::report::{build_report, class, decode_response, CommandId, Report, VariableStorage};
use crate::safety;
use crate::transport::{transfer, HidTransport};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const SET_DPI_XY: CommandId = CommandId::set(0x05);
pub const GET_DPI_XY: CommandId = CommandId::get(0x05);

const DPI_DATA_SIZE: u8 = 0x07;
/// Argument bytes a getDpiXY answer must cover: storage flag plus two axes.
const DPI_RESPONSE_LEN: u8 = 0x05;

/// Per-axis sensor resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dpi {
    pub x: u16,
    pub y: u16,
}

/// Build a setDpiXY report. Both axes are clamped to the safe range.
pub fn build_set_dpi_xy(storage: VariableStorage, dpi_x: u16, dpi_y: u16) -> Report {
    let mut report = build_report(class::DPI, SET_DPI_XY, DPI_DATA_SIZE);

    let dpi_x = safety::clamp_dpi(dpi_x);
    let dpi_y = safety::clamp_dpi(dpi_y);

    report.arguments[0] = storage.to_byte();
    report.arguments[1..3].copy_from_slice(&dpi_x.to_be_bytes());
    report.arguments[3..5].copy_from_slice(&dpi_y.to_be_bytes());

    report.finalize()
}

/// Build a getDpiXY report.
pub fn build_get_dpi_xy(storage: VariableStorage) -> Report {
    let mut report = build_report(class::DPI, GET_DPI_XY, DPI_DATA_SIZE);
    report.arguments[0] = storage.to_byte();
    report.finalize()
}

/// Decode the answer to a getDpiXY `request`.
pub fn parse_dpi_xy(request: &Report, raw: &[u8]) -> Result<Dpi> {
    let response = decode_response(raw, request, DPI_RESPONSE_LEN)?;
    let args = response.payload();
    Ok(Dpi {
        x: u16::from_be_bytes([args[1], args[2]]),
        y: u16::from_be_bytes([args[3], args[4]]),
    })
}

/// Read the current DPI of both axes.
pub fn read_dpi(transport: &dyn HidTransport, storage: VariableStorage) -> Result<Dpi> {
    let request = build_get_dpi_xy(storage);
    let raw = transfer(transport, &request)?;
    let dpi = parse_dpi_xy(&request, &raw)?;
    debug!(x = dpi.x, y = dpi.y, "DPI read");
    Ok(dpi)
}

/// Write per-axis DPI. Returns the values actually sent after clamping.
pub fn write_dpi_xy(
    transport: &dyn HidTransport,
    storage: VariableStorage,
    dpi_x: u16,
    dpi_y: u16,
) -> Result<Dpi> {
    let written = Dpi {
        x: safety::clamp_dpi(dpi_x),
        y: safety::clamp_dpi(dpi_y),
    };

    let request = build_set_dpi_xy(storage, written.x, written.y);
    let raw = transfer(transport, &request)?;
    decode_response(&raw, &request, 0)?;

    debug!(x = written.x, y = written.y, ?storage, "DPI written");
    Ok(written)
}

/// Write the same DPI to both axes.
pub fn write_dpi(transport: &dyn HidTransport, storage: VariableStorage, dpi: u16) -> Result<Dpi> {
    write_dpi_xy(transport, storage, dpi, dpi)
}
