//! Unit tests for the joystick report and its descriptor.
//!
//! These tests run on the host (not embedded) and verify the pure
//! logic of report packing, parsing, and descriptor layout.

use super::descriptor::{HID_INFORMATION, INPUT_REPORT_REFERENCE, PNP_ID};
use super::joystick::{clamp_axis, JoystickReport, JOYSTICK_REPORT_SIZE};
use super::report_protocol::ReportLayout;
use super::{validate_descriptor, JOYSTICK_REPORT_DESCRIPTOR};
use crate::error::Error;

// ═══════════════════════════════════════════════════════════════════════════
// Joystick Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn joystick_report_neutral() {
    let report = JoystickReport::neutral();
    assert!(report.is_neutral());
    assert!(!report.button);
    assert_eq!(report.axes, [0; 5]);
    assert_eq!(report, JoystickReport::default());
}

#[test]
fn joystick_report_neutral_bytes() {
    let bytes = JoystickReport::neutral().to_bytes();
    assert_eq!(bytes, [0x01, 0x00, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn joystick_report_scenario_bytes() {
    let report = JoystickReport::new([100, -200, 300, -400, 500], true);
    assert_eq!(
        report.to_bytes(),
        [0x01, 0x01, 0x64, 0x00, 0x38, 0xFF, 0x2C, 0x01, 0x70, 0xFE, 0xF4, 0x01]
    );
}

#[test]
fn joystick_report_extremes() {
    let report = JoystickReport::new([i16::MIN, i16::MAX, -1, 1, 0], false);
    let bytes = report.to_bytes();
    assert_eq!(bytes[1], 0x00);
    assert_eq!(&bytes[2..4], &[0x00, 0x80]);
    assert_eq!(&bytes[4..6], &[0xFF, 0x7F]);
    assert_eq!(&bytes[6..8], &[0xFF, 0xFF]);
    assert_eq!(&bytes[8..10], &[0x01, 0x00]);
    assert_eq!(&bytes[10..12], &[0x00, 0x00]);
}

#[test]
fn joystick_report_button_only_sets_bit0() {
    let bytes = JoystickReport::new([0; 5], true).to_bytes();
    assert_eq!(bytes[1], 0x01);
}

#[test]
fn joystick_report_serialize_buffer_too_small() {
    let report = JoystickReport::neutral();
    let mut small_buf = [0u8; 11];
    assert_eq!(report.serialize(&mut small_buf), 0);
}

#[test]
fn joystick_report_serialize_into_larger_buffer() {
    let report = JoystickReport::new([1, 2, 3, 4, 5], false);
    let mut buf = [0xAAu8; 16];
    let written = report.serialize(&mut buf);
    assert_eq!(written, JOYSTICK_REPORT_SIZE);
    assert_eq!(&buf[12..], &[0xAA; 4]);
}

#[test]
fn clamp_axis_saturates() {
    assert_eq!(clamp_axis(40_000), i16::MAX);
    assert_eq!(clamp_axis(-40_000), i16::MIN);
    assert_eq!(clamp_axis(32_767), 32_767);
    assert_eq!(clamp_axis(-32_768), -32_768);
    assert_eq!(clamp_axis(-5), -5);
}

#[test]
fn joystick_report_from_wide_clamps() {
    let report = JoystickReport::from_wide([70_000, -70_000, 0, 12, i32::MIN], false);
    assert_eq!(report.axes, [i16::MAX, i16::MIN, 0, 12, i16::MIN]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Descriptor Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn descriptor_length_and_framing() {
    assert_eq!(JOYSTICK_REPORT_DESCRIPTOR.len(), 58);
    assert_eq!(&JOYSTICK_REPORT_DESCRIPTOR[..4], &[0x05, 0x01, 0x09, 0x04]);
    assert_eq!(&JOYSTICK_REPORT_DESCRIPTOR[56..], &[0xC0, 0xC0]);
}

#[test]
fn descriptor_layout_matches_report() {
    let layout = ReportLayout::parse(JOYSTICK_REPORT_DESCRIPTOR).unwrap();
    assert!(layout.is_joystick);
    assert_eq!(layout.report_id, Some(1));
    assert_eq!(layout.buttons, 1);
    assert_eq!(layout.axes, 5);
    assert_eq!(layout.axis_bits, 16);
    assert_eq!(layout.axis_logical_min, -32768);
    assert_eq!(layout.axis_logical_max, 32767);
    assert_eq!(layout.input_bits, 88);
    assert_eq!(layout.input_len(), JOYSTICK_REPORT_SIZE);
}

#[test]
fn validate_descriptor_accepts_joystick() {
    assert!(validate_descriptor(JOYSTICK_REPORT_DESCRIPTOR).is_ok());
}

#[test]
fn validate_descriptor_rejects_short_report() {
    // Same joystick with only four axes.
    let mut desc = [0u8; 58];
    desc.copy_from_slice(JOYSTICK_REPORT_DESCRIPTOR);
    desc[43] = 0x04;
    assert_eq!(
        validate_descriptor(&desc).unwrap_err(),
        Error::DescriptorMismatch
    );
}

#[test]
fn validate_descriptor_rejects_mouse() {
    let mouse = [
        0x05, 0x01, 0x09, 0x02, 0xA1, 0x01, 0x85, 0x01, 0x05, 0x09, 0x19, 0x01, 0x29, 0x03,
        0x75, 0x01, 0x95, 0x03, 0x81, 0x02, 0xC0,
    ];
    assert_eq!(validate_descriptor(&mouse), Err(Error::DescriptorMismatch));
}

#[test]
fn parse_rejects_truncated_descriptor() {
    // Logical Minimum announces two data bytes but only one follows.
    assert!(ReportLayout::parse(&[0x05, 0x01, 0x16, 0x00]).is_none());
}

#[test]
fn parse_rejects_unbalanced_collections() {
    assert!(ReportLayout::parse(&JOYSTICK_REPORT_DESCRIPTOR[..57]).is_none());
    assert!(ReportLayout::parse(&[0xC0]).is_none());
}

#[test]
fn parse_rejects_oversized_input_field() {
    // Report Size 0xFFFF times Report Count 2 does not fit the bit total.
    let desc = [0xA1, 0x01, 0x76, 0xFF, 0xFF, 0x95, 0x02, 0x81, 0x02, 0xC0];
    assert!(ReportLayout::parse(&desc).is_none());
}

#[test]
fn parse_rejects_too_many_buttons() {
    // 256 one-bit buttons in a single input item.
    let desc = [0x05, 0x09, 0x75, 0x01, 0x96, 0x00, 0x01, 0x81, 0x02];
    assert!(ReportLayout::parse(&desc).is_none());
}

#[test]
fn parse_rejects_deep_collection_nesting() {
    let mut desc = Vec::new();
    for _ in 0..256 {
        desc.extend_from_slice(&[0xA1, 0x00]);
    }
    assert!(ReportLayout::parse(&desc).is_none());

    // 255 levels still parse.
    let mut desc = Vec::new();
    for _ in 0..255 {
        desc.extend_from_slice(&[0xA1, 0x00]);
    }
    desc.extend_from_slice(&[0x75, 0x08, 0x95, 0x01, 0x81, 0x03]);
    desc.extend(core::iter::repeat(0xC0).take(255));
    assert_eq!(ReportLayout::parse(&desc).map(|l| l.input_bits), Some(8));
}

#[test]
fn parse_rejects_descriptor_without_inputs() {
    assert!(ReportLayout::parse(&[0x05, 0x01, 0x09, 0x04, 0xA1, 0x01, 0xC0]).is_none());
}

#[test]
fn fixed_characteristic_values() {
    assert_eq!(HID_INFORMATION, [0x11, 0x01, 0x00, 0x00]);
    assert_eq!(INPUT_REPORT_REFERENCE, [0x01, 0x01]);
    assert_eq!(PNP_ID, [0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x01]);
}
