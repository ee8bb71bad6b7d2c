//! Bluetooth SIG 16-bit UUIDs used by the HID-over-GATT profile.
//!
//! Each UUID is carried twice: the 16-bit short form handed to the
//! transport, and the canonical 128-bit string used in property records.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GattUuid {
    short: u16,
    canonical: &'static str,
}

impl GattUuid {
    const fn sig(short: u16, canonical: &'static str) -> Self {
        Self { short, canonical }
    }

    /// 16-bit assigned number.
    pub const fn short(&self) -> u16 {
        self.short
    }

    /// `0000XXXX-0000-1000-8000-00805f9b34fb`.
    pub const fn as_str(&self) -> &'static str {
        self.canonical
    }

    /// Little-endian encoding as it appears in AD structures.
    pub const fn to_le_bytes(&self) -> [u8; 2] {
        self.short.to_le_bytes()
    }
}

// Services
pub const HID_SERVICE: GattUuid = GattUuid::sig(0x1812, "00001812-0000-1000-8000-00805f9b34fb");

// Characteristics
pub const HID_INFORMATION: GattUuid =
    GattUuid::sig(0x2A4A, "00002a4a-0000-1000-8000-00805f9b34fb");
pub const REPORT_MAP: GattUuid = GattUuid::sig(0x2A4B, "00002a4b-0000-1000-8000-00805f9b34fb");
pub const HID_CONTROL_POINT: GattUuid =
    GattUuid::sig(0x2A4C, "00002a4c-0000-1000-8000-00805f9b34fb");
pub const REPORT: GattUuid = GattUuid::sig(0x2A4D, "00002a4d-0000-1000-8000-00805f9b34fb");
pub const PROTOCOL_MODE: GattUuid = GattUuid::sig(0x2A4E, "00002a4e-0000-1000-8000-00805f9b34fb");
pub const PNP_ID: GattUuid = GattUuid::sig(0x2A50, "00002a50-0000-1000-8000-00805f9b34fb");

// Descriptors
pub const CLIENT_CHARACTERISTIC_CONFIGURATION: GattUuid =
    GattUuid::sig(0x2902, "00002902-0000-1000-8000-00805f9b34fb");
pub const REPORT_REFERENCE: GattUuid =
    GattUuid::sig(0x2908, "00002908-0000-1000-8000-00805f9b34fb");

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_nibble(c: u8) -> u16 {
        match c {
            b'0'..=b'9' => (c - b'0') as u16,
            b'a'..=b'f' => (c - b'a' + 10) as u16,
            _ => panic!("not lowercase hex"),
        }
    }

    #[test]
    fn canonical_strings_embed_short_form() {
        let all = [
            HID_SERVICE,
            HID_INFORMATION,
            REPORT_MAP,
            HID_CONTROL_POINT,
            REPORT,
            PROTOCOL_MODE,
            PNP_ID,
            CLIENT_CHARACTERISTIC_CONFIGURATION,
            REPORT_REFERENCE,
        ];
        for uuid in all {
            let s = uuid.as_str().as_bytes();
            assert_eq!(s.len(), 36);
            assert!(uuid.as_str().ends_with("-0000-1000-8000-00805f9b34fb"));
            let short = s[4..8].iter().fold(0u16, |acc, &c| (acc << 4) | hex_nibble(c));
            assert_eq!(short, uuid.short());
        }
    }

    #[test]
    fn le_bytes() {
        assert_eq!(HID_SERVICE.to_le_bytes(), [0x12, 0x18]);
    }
}
