//! LE advertisement object and its legacy advertising payload.
//!
//! The payload carries, in order: Flags, the complete list of 16-bit service
//! UUIDs, Appearance, and the complete local name. The scan response is
//! empty. TX power is never included.

use heapless::Vec;

use crate::config::{ADV_FLAGS, APPEARANCE_HID_JOYSTICK, DEVICE_NAME};
use crate::error::Error;
use crate::gatt::path::ObjectPath;
use crate::gatt::properties::{Interface, PropertyList, PropertyValue};
use crate::gatt::uuid::{self, GattUuid};

/// Legacy advertising PDU payload limit.
pub const MAX_ADV_DATA_LEN: usize = 31;

/// AD type codes.
pub mod ad_type {
    pub const FLAGS: u8 = 0x01;
    pub const COMPLETE_16BIT_UUIDS: u8 = 0x03;
    pub const COMPLETE_LOCAL_NAME: u8 = 0x09;
    pub const APPEARANCE: u8 = 0x19;
}

pub type AdvPayload = Vec<u8, MAX_ADV_DATA_LEN>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvertisingType {
    /// Connectable, scannable undirected.
    Peripheral,
}

impl AdvertisingType {
    pub const fn name(self) -> &'static str {
        match self {
            AdvertisingType::Peripheral => "peripheral",
        }
    }
}

/// Property record published on `org.bluez.LEAdvertisement1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AdvertisementProperties<'a> {
    pub kind: AdvertisingType,
    pub service_uuids: &'a [&'a str],
    pub local_name: &'a str,
    pub appearance: u16,
    pub includes: &'a [&'a str],
}

impl<'a> AdvertisementProperties<'a> {
    pub fn entries(&self) -> PropertyList<'a, 5> {
        let mut out = Vec::new();
        let _ = out.push(("Type", PropertyValue::Str(self.kind.name())));
        let _ = out.push(("ServiceUUIDs", PropertyValue::StrList(self.service_uuids)));
        let _ = out.push(("LocalName", PropertyValue::Str(self.local_name)));
        let _ = out.push(("Appearance", PropertyValue::U16(self.appearance)));
        let _ = out.push(("Includes", PropertyValue::StrList(self.includes)));
        out
    }
}

const SERVICE_UUID_NAMES: [&str; 1] = ["1812"];
const INCLUDES_NONE: [&str; 0] = [];

pub struct Advertisement {
    path: ObjectPath,
    kind: AdvertisingType,
    service_uuids: [GattUuid; 1],
    local_name: &'static str,
    appearance: u16,
    flags: u8,
}

impl Advertisement {
    /// The joystick advertisement, exported at `path`.
    pub fn new(path: &str) -> Result<Self, Error> {
        Ok(Self {
            path: ObjectPath::new(path)?,
            kind: AdvertisingType::Peripheral,
            service_uuids: [uuid::HID_SERVICE],
            local_name: DEVICE_NAME,
            appearance: APPEARANCE_HID_JOYSTICK,
            flags: ADV_FLAGS,
        })
    }

    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    pub fn kind(&self) -> AdvertisingType {
        self.kind
    }

    pub fn local_name(&self) -> &'static str {
        self.local_name
    }

    pub fn properties(&self) -> AdvertisementProperties<'static> {
        AdvertisementProperties {
            kind: self.kind,
            service_uuids: &SERVICE_UUID_NAMES,
            local_name: self.local_name,
            appearance: self.appearance,
            includes: &INCLUDES_NONE,
        }
    }

    /// `GetAll(interface)`.
    pub fn get_all(&self, interface: Interface) -> Result<AdvertisementProperties<'static>, Error> {
        if interface != Interface::LeAdvertisement {
            return Err(Error::InvalidInterface);
        }
        Ok(self.properties())
    }

    /// Called by the host when it drops the advertisement.
    pub fn release(&self) {
        info!("advertisement {} released", self.path.as_str());
    }

    /// Legacy advertising data, bit-exact.
    pub fn adv_data(&self) -> Result<AdvPayload, Error> {
        let mut out = AdvPayload::new();
        push_ad(&mut out, ad_type::FLAGS, &[self.flags])?;

        let mut uuids: Vec<u8, 4> = Vec::new();
        for uuid in &self.service_uuids {
            uuids
                .extend_from_slice(&uuid.to_le_bytes())
                .map_err(|_| Error::BufferOverflow)?;
        }
        push_ad(&mut out, ad_type::COMPLETE_16BIT_UUIDS, &uuids)?;
        push_ad(&mut out, ad_type::APPEARANCE, &self.appearance.to_le_bytes())?;
        push_ad(&mut out, ad_type::COMPLETE_LOCAL_NAME, self.local_name.as_bytes())?;
        Ok(out)
    }

    /// Scan response data. Always empty.
    pub fn scan_data(&self) -> &'static [u8] {
        &[]
    }
}

fn push_ad(out: &mut AdvPayload, ty: u8, data: &[u8]) -> Result<(), Error> {
    let len = u8::try_from(data.len() + 1).map_err(|_| Error::BufferOverflow)?;
    out.push(len).map_err(|_| Error::BufferOverflow)?;
    out.push(ty).map_err(|_| Error::BufferOverflow)?;
    out.extend_from_slice(data)
        .map_err(|_| Error::BufferOverflow)
}
