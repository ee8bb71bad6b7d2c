//! HID Report Descriptor parser.
//!
//! Walks a Report Descriptor and derives the layout of its input report so
//! the descriptor served in the Report Map can be checked against the
//! encoder in [`super::joystick`].
//!
//! Items understood: Usage Page, Usage, Report ID, Report Size, Report
//! Count, Logical Minimum/Maximum, Collection/End Collection and Input.
//! Only the first report ID is kept; Push/Pop and Delimiter are skipped.

/// Usage pages the parser distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsagePage {
    GenericDesktop,
    Button,
    Unknown(u16),
}

impl From<u16> for UsagePage {
    fn from(code: u16) -> Self {
        match code {
            0x01 => UsagePage::GenericDesktop,
            0x09 => UsagePage::Button,
            other => UsagePage::Unknown(other),
        }
    }
}

/// Generic Desktop usage codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DesktopUsage {
    Joystick,
    Gamepad,
    X,
    Y,
    Z,
    Rx,
    Ry,
    Rz,
    Unknown(u16),
}

impl From<u16> for DesktopUsage {
    fn from(code: u16) -> Self {
        match code {
            0x04 => DesktopUsage::Joystick,
            0x05 => DesktopUsage::Gamepad,
            0x30 => DesktopUsage::X,
            0x31 => DesktopUsage::Y,
            0x32 => DesktopUsage::Z,
            0x33 => DesktopUsage::Rx,
            0x34 => DesktopUsage::Ry,
            0x35 => DesktopUsage::Rz,
            other => DesktopUsage::Unknown(other),
        }
    }
}

impl DesktopUsage {
    fn is_axis(self) -> bool {
        matches!(
            self,
            DesktopUsage::X
                | DesktopUsage::Y
                | DesktopUsage::Z
                | DesktopUsage::Rx
                | DesktopUsage::Ry
                | DesktopUsage::Rz
        )
    }
}

/// Input-report layout derived from a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportLayout {
    /// Application collection is a joystick or gamepad.
    pub is_joystick: bool,
    /// Report ID of the input report, when the descriptor declares one.
    pub report_id: Option<u8>,
    /// Total input bits including constant padding, excluding the report ID.
    pub input_bits: u16,
    /// Number of 1-bit button fields.
    pub buttons: u8,
    /// Number of axis fields.
    pub axes: u8,
    /// Bits per axis field.
    pub axis_bits: u16,
    /// Logical range of the axis fields.
    pub axis_logical_min: i32,
    pub axis_logical_max: i32,
}

impl ReportLayout {
    /// Bytes on the wire, report ID included.
    pub fn input_len(&self) -> usize {
        (self.input_bits as usize).div_ceil(8) + self.report_id.is_some() as usize
    }

    /// Parse a HID Report Descriptor.
    ///
    /// Returns `None` when the descriptor is truncated, its collections are
    /// unbalanced or nest too deep, its field counts overflow, or it declares
    /// no input fields.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut layout = ReportLayout {
            is_joystick: false,
            report_id: None,
            input_bits: 0,
            buttons: 0,
            axes: 0,
            axis_bits: 0,
            axis_logical_min: 0,
            axis_logical_max: 0,
        };

        // Global state.
        let mut usage_page = UsagePage::Unknown(0);
        let mut report_size: u16 = 0;
        let mut report_count: u16 = 0;
        let mut logical_min: i32 = 0;
        let mut logical_max: i32 = 0;

        // Local state, cleared after every main item.
        let mut usage: Option<u16> = None;
        let mut axis_usages: u16 = 0;

        let mut depth: u8 = 0;

        let mut i = 0;
        while i < data.len() {
            let prefix = data[i];
            let tag = (prefix >> 4) & 0x0F;
            let item_type = (prefix >> 2) & 0x03;
            let size = match prefix & 0x03 {
                0 => 0,
                1 => 1,
                2 => 2,
                _ => 4,
            };

            if i + 1 + size > data.len() {
                return None;
            }

            let value: u32 = match size {
                0 => 0,
                1 => data[i + 1] as u32,
                2 => u16::from_le_bytes([data[i + 1], data[i + 2]]) as u32,
                _ => u32::from_le_bytes([data[i + 1], data[i + 2], data[i + 3], data[i + 4]]),
            };
            let signed: i32 = match size {
                0 => 0,
                1 => value as u8 as i8 as i32,
                2 => value as u16 as i16 as i32,
                _ => value as i32,
            };

            match item_type {
                // Main items
                0 => {
                    match tag {
                        // Input
                        0x08 => {
                            let is_constant = (value & 0x01) != 0;
                            layout.input_bits = layout
                                .input_bits
                                .checked_add(report_size.checked_mul(report_count)?)?;

                            if !is_constant {
                                match usage_page {
                                    UsagePage::Button if report_size == 1 => {
                                        let count = u8::try_from(report_count).ok()?;
                                        layout.buttons = layout.buttons.checked_add(count)?;
                                    }
                                    UsagePage::GenericDesktop if axis_usages > 0 => {
                                        let count =
                                            u8::try_from(report_count.min(axis_usages)).ok()?;
                                        layout.axes = layout.axes.checked_add(count)?;
                                        layout.axis_bits = report_size;
                                        layout.axis_logical_min = logical_min;
                                        layout.axis_logical_max = logical_max;
                                    }
                                    _ => {}
                                }
                            }
                        }
                        // Collection
                        0x0A => {
                            depth = depth.checked_add(1)?;
                            // Application collection.
                            if value == 0x01
                                && usage_page == UsagePage::GenericDesktop
                                && matches!(
                                    usage.map(DesktopUsage::from),
                                    Some(DesktopUsage::Joystick | DesktopUsage::Gamepad)
                                )
                            {
                                layout.is_joystick = true;
                            }
                        }
                        // End Collection
                        0x0C => {
                            depth = depth.checked_sub(1)?;
                        }
                        _ => {}
                    }
                    usage = None;
                    axis_usages = 0;
                }
                // Global items
                1 => match tag {
                    // Usage Page
                    0x00 => usage_page = UsagePage::from(value as u16),
                    // Logical Minimum
                    0x01 => logical_min = signed,
                    // Logical Maximum
                    0x02 => logical_max = signed,
                    // Report Size
                    0x07 => report_size = value as u16,
                    // Report ID
                    0x08 => {
                        if layout.report_id.is_none() {
                            layout.report_id = Some(value as u8);
                        }
                    }
                    // Report Count
                    0x09 => report_count = value as u16,
                    _ => {}
                },
                // Local items
                2 => {
                    if tag == 0x00 {
                        usage = Some(value as u16);
                        if DesktopUsage::from(value as u16).is_axis() {
                            axis_usages = axis_usages.saturating_add(1);
                        }
                    }
                }
                _ => {}
            }

            i += 1 + size;
        }

        if depth != 0 || layout.input_bits == 0 {
            debug!("HID descriptor: unbalanced or empty");
            return None;
        }
        Some(layout)
    }
}
