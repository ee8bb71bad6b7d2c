//! Pairing agent with no input and no output.
//!
//! Every prompt is accepted. Where a credential must be returned, a fixed
//! fallback is used: PIN "0000", passkey 0.

use core::fmt;

use crate::error::Error;
use crate::gatt::path::ObjectPath;
use crate::gatt::properties::Interface;

/// Fallback legacy PIN.
pub const FALLBACK_PIN_CODE: &str = "0000";
/// Fallback passkey.
pub const FALLBACK_PASSKEY: u32 = 0;

/// IO capability announced to the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoCapability {
    DisplayOnly,
    DisplayYesNo,
    KeyboardOnly,
    NoInputNoOutput,
    KeyboardDisplay,
}

impl IoCapability {
    pub const fn name(self) -> &'static str {
        match self {
            IoCapability::DisplayOnly => "DisplayOnly",
            IoCapability::DisplayYesNo => "DisplayYesNo",
            IoCapability::KeyboardOnly => "KeyboardOnly",
            IoCapability::NoInputNoOutput => "NoInputNoOutput",
            IoCapability::KeyboardDisplay => "KeyboardDisplay",
        }
    }
}

/// Bluetooth device address of the peer, most significant byte first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId(pub [u8; 6]);

impl DeviceId {
    /// From the little-endian byte order used on air.
    pub fn from_le_bytes(mut bytes: [u8; 6]) -> Self {
        bytes.reverse();
        Self(bytes)
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

pub struct NoInputNoOutputAgent {
    path: ObjectPath,
}

impl NoInputNoOutputAgent {
    pub fn new(path: &str) -> Result<Self, Error> {
        Ok(Self {
            path: ObjectPath::new(path)?,
        })
    }

    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    pub const fn capability(&self) -> IoCapability {
        IoCapability::NoInputNoOutput
    }

    pub const fn interface(&self) -> Interface {
        Interface::Agent
    }

    pub fn request_authorization(&self, device: DeviceId) -> Result<(), Error> {
        info!("authorizing {}", device.0);
        Ok(())
    }

    pub fn authorize_service(&self, device: DeviceId, uuid: &str) -> Result<(), Error> {
        info!("authorizing service {} for {}", uuid, device.0);
        Ok(())
    }

    /// Numeric comparison: accepted without checking `passkey`.
    pub fn request_confirmation(&self, device: DeviceId, passkey: u32) -> Result<(), Error> {
        info!("confirming passkey {=u32} for {}", passkey, device.0);
        Ok(())
    }

    pub fn request_pin_code(&self, device: DeviceId) -> Result<&'static str, Error> {
        info!("PIN requested by {}", device.0);
        Ok(FALLBACK_PIN_CODE)
    }

    pub fn request_passkey(&self, device: DeviceId) -> Result<u32, Error> {
        info!("passkey requested by {}", device.0);
        Ok(FALLBACK_PASSKEY)
    }

    pub fn display_passkey(&self, device: DeviceId, passkey: u32, entered: u16) {
        info!("passkey {=u32} for {} ({} entered)", passkey, device.0, entered);
    }

    pub fn display_pin_code(&self, device: DeviceId, pin_code: &str) {
        info!("PIN {} for {}", pin_code, device.0);
    }

    pub fn cancel(&self) {
        info!("pairing cancelled");
    }

    pub fn release(&self) {
        info!("agent {} released", self.path.as_str());
    }
}
