//! razer-hid-core: report protocol layer for Razer HID mice.
//!
//! This crate builds and validates the fixed 90-byte, XOR-checksummed
//! reports that the Basilisk X HyperSpeed firmware exchanges over USB HID,
//! and decodes typed values (DPI, polling rate, battery, firmware, serial)
//! from the device's answers. Device discovery and connection management
//! belong to the host; the crate only needs a [`transport::HidTransport`].

pub mod device;
pub mod dpi;
pub mod error;
pub mod info;
pub mod power;
pub mod report;
pub mod report_rate;
pub mod safety;
pub mod transport;

/// Razer USB Vendor ID.
pub const RAZER_VID: u16 = 0x1532;

/// Known Razer product IDs.
pub mod pids {
    /// Basilisk X HyperSpeed (wireless receiver).
    pub const BASILISK_X_HYPERSPEED: u16 = 0x0083;
}

/// Storage flag: apply the setting without persisting it.
pub const NOSTORE: u8 = 0x00;
/// Storage flag: persist the setting on the device.
pub const VARSTORE: u8 = 0x01;

/// LED state and LED identifiers.
pub mod led {
    pub const OFF: u8 = 0x00;
    pub const ON: u8 = 0x01;

    pub const ZERO_LED: u8 = 0x00;
    pub const SCROLL_WHEEL_LED: u8 = 0x01;
    pub const BATTERY_LED: u8 = 0x03;
    pub const LOGO_LED: u8 = 0x04;
    pub const BACKLIGHT_LED: u8 = 0x05;
}
