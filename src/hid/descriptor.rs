//! HID Report Descriptor served through the Report Map characteristic.
//!
//! One input report (ID 1):
//! ```text
//! Byte 0:     Report ID (0x01)
//! Byte 1:     Bit 0 = Button 1, Bits 1-7 = padding
//! Byte 2-11:  X, Y, Z, Rx, Ry (signed 16-bit, little-endian)
//! ```

/// HID Report Descriptor for a one-button, five-axis joystick.
pub const JOYSTICK_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x04, // Usage (Joystick)
    0xA1, 0x01, // Collection (Application)
    0x85, 0x01, //   Report ID (1)
    0xA1, 0x00, //   Collection (Physical)
    //
    //     - Button (1 bit + 7 padding) -
    0x05, 0x09, //     Usage Page (Button)
    0x19, 0x01, //     Usage Minimum (Button 1)
    0x29, 0x01, //     Usage Maximum (Button 1)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x75, 0x01, //     Report Size (1)
    0x95, 0x01, //     Report Count (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x75, 0x07, //     Report Size (7)
    0x95, 0x01, //     Report Count (1)
    0x81, 0x03, //     Input (Constant, Variable, Absolute) - padding
    //
    //     - Five 16-bit axes -
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x16, 0x00, 0x80, // Logical Minimum (-32768)
    0x26, 0xFF, 0x7F, // Logical Maximum (32767)
    0x75, 0x10, //     Report Size (16)
    0x95, 0x05, //     Report Count (5)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x09, 0x32, //     Usage (Z)
    0x09, 0x33, //     Usage (Rx)
    0x09, 0x34, //     Usage (Ry)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    //
    0xC0, //   End Collection (Physical)
    0xC0, // End Collection (Application)
];

/// HID Information characteristic value: bcdHID 1.11, country 0, flags 0.
pub const HID_INFORMATION: [u8; 4] = [0x11, 0x01, 0x00, 0x00];

/// Report Reference descriptor value: report ID 1, type Input (1).
pub const INPUT_REPORT_REFERENCE: [u8; 2] = [0x01, 0x01];

/// PnP ID: vendor-id source SIG, vendor 0x0000, product 0x0001, version 0x0001.
pub const PNP_ID: [u8; 7] = [0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x01];

/// Protocol Mode values.
pub const PROTOCOL_MODE_BOOT: u8 = 0x00;
pub const PROTOCOL_MODE_REPORT: u8 = 0x01;
