//! HID report types, the static report descriptor and its layout checks.

pub mod descriptor;
pub mod joystick;
pub mod report_protocol;

#[cfg(test)]
mod tests;

pub use descriptor::JOYSTICK_REPORT_DESCRIPTOR;
pub use joystick::{JoystickReport, JOYSTICK_REPORT_ID, JOYSTICK_REPORT_SIZE};
use report_protocol::ReportLayout;

use crate::error::Error;

/// Check that `descriptor` declares the report [`JoystickReport`] encodes.
///
/// Fails with [`Error::DescriptorMismatch`] if the descriptor cannot be
/// parsed, is not a joystick, or its input report differs in ID or length.
pub fn validate_descriptor(descriptor: &[u8]) -> Result<ReportLayout, Error> {
    let layout = ReportLayout::parse(descriptor).ok_or(Error::DescriptorMismatch)?;

    if !layout.is_joystick
        || layout.report_id != Some(JOYSTICK_REPORT_ID)
        || layout.input_len() != JOYSTICK_REPORT_SIZE
    {
        warn!(
            "HID descriptor mismatch: id={} len={}",
            layout.report_id,
            layout.input_len()
        );
        return Err(Error::DescriptorMismatch);
    }
    Ok(layout)
}
