//! Battery level and charging state (command class 0x07).
//!
//! Commands:
//!   - 0x80 getBatteryLevel → response args[0] = raw level (0-255)
//!   - 0x84 getChargingStatus → response args[0] = 1 while charging
//!
//! Both are read-only and use data size 2.

use crate::error::Result;
use crate::report::{build_report, class, decode_response, CommandId, Report};
use crate::transport::{transfer, HidTransport};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const GET_BATTERY_LEVEL: CommandId = CommandId::get(0x00);
pub const GET_CHARGING_STATUS: CommandId = CommandId::get(0x04);

const POWER_DATA_SIZE: u8 = 0x02;
const POWER_RESPONSE_LEN: u8 = 0x01;

/// Raw battery level as reported by the device (0 = empty, 255 = full).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u8 {
        self.0
    }

    /// Level scaled to 0-100, rounded to nearest.
    pub fn percent(&self) -> u8 {
        ((self.0 as u16 * 100 + 127) / 255) as u8
    }
}

impl std::fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Build a getBatteryLevel report.
pub fn build_get_battery_level() -> Report {
    build_report(class::POWER, GET_BATTERY_LEVEL, POWER_DATA_SIZE).finalize()
}

/// Build a getChargingStatus report.
pub fn build_get_charging_status() -> Report {
    build_report(class::POWER, GET_CHARGING_STATUS, POWER_DATA_SIZE).finalize()
}

/// Decode the answer to a getBatteryLevel `request`.
pub fn parse_battery_level(request: &Report, raw: &[u8]) -> Result<BatteryLevel> {
    let response = decode_response(raw, request, POWER_RESPONSE_LEN)?;
    Ok(BatteryLevel(response.payload()[0]))
}

/// Decode the answer to a getChargingStatus `request`.
pub fn parse_charging_status(request: &Report, raw: &[u8]) -> Result<bool> {
    let response = decode_response(raw, request, POWER_RESPONSE_LEN)?;
    Ok(response.payload()[0] != 0)
}

/// Read the battery level.
pub fn read_battery_level(transport: &dyn HidTransport) -> Result<BatteryLevel> {
    let request = build_get_battery_level();
    let raw = transfer(transport, &request)?;
    let level = parse_battery_level(&request, &raw)?;
    debug!(raw = level.raw(), percent = level.percent(), "Battery level read");
    Ok(level)
}

/// Read whether the device is charging.
pub fn read_charging_status(transport: &dyn HidTransport) -> Result<bool> {
    let request = build_get_charging_status();
    let raw = transfer(transport, &request)?;
    let charging = parse_charging_status(&request, &raw)?;
    debug!(charging, "Charging status read");
    Ok(charging)
}
