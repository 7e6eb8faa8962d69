//! Safety layer: normalizes write parameters into ranges the firmware
//! accepts before they are encoded into a report.
//!
//! Unlike a validation layer, nothing here fails. Out-of-range input is
//! coerced to a safe value and the coercion is logged.
//!
//! # Basilisk X HyperSpeed Bounds
//!
//! ## DPI
//! - **Range**: 100 – 35,000 DPI per axis
//! - **Policy**: values outside the range are clamped, not rejected
//!
//! ## Polling Rate
//! - **Supported values**: 125 Hz, 500 Hz, 1000 Hz
//! - **Policy**: any other value falls back to 500 Hz

use crate::device::PollingRate;
use tracing::debug;

/// DPI constraints.
pub const DPI_MIN: u16 = 100;
pub const DPI_MAX: u16 = 35000;

/// Rate used when the requested polling rate is not supported.
pub const FALLBACK_POLLING_RATE: PollingRate = PollingRate::Hz500;

/// Clamp a DPI value into [`DPI_MIN`, `DPI_MAX`].
pub fn clamp_dpi(dpi: u16) -> u16 {
    let clamped = dpi.clamp(DPI_MIN, DPI_MAX);
    if clamped != dpi {
        debug!(requested = dpi, clamped = clamped, "DPI clamped to safe range");
    }
    clamped
}

/// Map a requested rate in Hz to a supported rate, falling back to 500 Hz.
pub fn normalize_polling_rate(hz: u16) -> PollingRate {
    PollingRate::from_hz(hz).unwrap_or_else(|| {
        debug!(
            requested = hz,
            fallback = FALLBACK_POLLING_RATE.as_hz(),
            "Unsupported polling rate, using fallback"
        );
        FALLBACK_POLLING_RATE
    })
}
