//! BLE HID joystick input report.
//!
//! Layout (12 bytes):
//! ```text
//! Byte 0:     Report ID (0x01)
//! Byte 1:     Bit 0 = button, bits 1-7 reserved (0)
//! Byte 2-11:  Five axes, each signed 16-bit little-endian
//! ```

use crate::config::AXIS_COUNT;

/// Report ID declared in the report descriptor.
pub const JOYSTICK_REPORT_ID: u8 = 0x01;

/// Joystick report size in bytes, report ID included.
pub const JOYSTICK_REPORT_SIZE: usize = 2 + AXIS_COUNT * 2;

/// One sample of the joystick state.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoystickReport {
    /// Button 1 pressed.
    pub button: bool,
    /// X, Y, Z, Rx, Ry.
    pub axes: [i16; AXIS_COUNT],
}

/// Clamp a wide axis value into the signed 16-bit axis domain.
pub fn clamp_axis(value: i32) -> i16 {
    value.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

impl JoystickReport {
    /// Button released, all axes centred.
    pub const fn neutral() -> Self {
        Self {
            button: false,
            axes: [0; AXIS_COUNT],
        }
    }

    pub const fn new(axes: [i16; AXIS_COUNT], button: bool) -> Self {
        Self { button, axes }
    }

    /// Build a report from unclamped axis values.
    ///
    /// Out-of-range input is a caller bug; it is clamped, never rejected.
    pub fn from_wide(axes: [i32; AXIS_COUNT], button: bool) -> Self {
        Self {
            button,
            axes: axes.map(clamp_axis),
        }
    }

    /// Serialise into a byte slice for notification.
    /// Returns the number of bytes written (always 12), or 0 if `buf` is too small.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < JOYSTICK_REPORT_SIZE {
            return 0;
        }
        buf[0] = JOYSTICK_REPORT_ID;
        buf[1] = self.button as u8;
        for (i, axis) in self.axes.iter().enumerate() {
            let lo = 2 + i * 2;
            buf[lo..lo + 2].copy_from_slice(&axis.to_le_bytes());
        }
        JOYSTICK_REPORT_SIZE
    }

    pub fn to_bytes(&self) -> [u8; JOYSTICK_REPORT_SIZE] {
        let mut buf = [0u8; JOYSTICK_REPORT_SIZE];
        self.serialize(&mut buf);
        buf
    }

    /// Returns `true` when the button is released and every axis is centred.
    pub fn is_neutral(&self) -> bool {
        !self.button && self.axes.iter().all(|&a| a == 0)
    }
}
