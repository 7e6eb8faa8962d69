//! Device model: supported mice, polling rates, and the status snapshot.

use crate::dpi::{self, Dpi};
use crate::error::Result;
use crate::pids;
use crate::power::{self, BatteryLevel};
use crate::report::VariableStorage;
use crate::report_rate;
use crate::transport::HidTransport;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Supported Razer mouse models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseModel {
    BasiliskXHyperspeed,
}

impl MouseModel {
    /// Look up model from USB product ID.
    pub fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            pids::BASILISK_X_HYPERSPEED => Some(Self::BasiliskXHyperspeed),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BasiliskXHyperspeed => "Razer Basilisk X HyperSpeed",
        }
    }

    /// USB Product ID.
    pub fn pid(&self) -> u16 {
        match self {
            Self::BasiliskXHyperspeed => pids::BASILISK_X_HYPERSPEED,
        }
    }
}

/// Polling rate options supported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum PollingRate {
    Hz125 = 125,
    Hz500 = 500,
    Hz1000 = 1000,
}

impl PollingRate {
    /// Convert from raw Hz value.
    pub fn from_hz(hz: u16) -> Option<Self> {
        match hz {
            125 => Some(Self::Hz125),
            500 => Some(Self::Hz500),
            1000 => Some(Self::Hz1000),
            _ => None,
        }
    }

    /// Get the Hz value.
    pub fn as_hz(&self) -> u16 {
        *self as u16
    }

    /// All supported rates.
    pub const ALL: &'static [PollingRate] =
        &[PollingRate::Hz125, PollingRate::Hz500, PollingRate::Hz1000];
}

impl std::fmt::Display for PollingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.as_hz())
    }
}

/// Snapshot of the values a host polls periodically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub dpi: Dpi,
    pub polling_rate: PollingRate,
    pub battery: BatteryLevel,
    pub charging: bool,
}

/// Read DPI, polling rate, battery level and charging state.
///
/// Four exchanges, one per value. The first failure aborts the snapshot;
/// no partially-filled state is returned.
pub fn read_device_state(transport: &dyn HidTransport) -> Result<DeviceState> {
    let dpi = dpi::read_dpi(transport, VariableStorage::NoStore)?;
    let polling_rate = report_rate::read_polling_rate(transport)?;
    let battery = power::read_battery_level(transport)?;
    let charging = power::read_charging_status(transport)?;

    let state = DeviceState {
        dpi,
        polling_rate,
        battery,
        charging,
    };
    debug!(?state, "Device state updated");
    Ok(state)
}
