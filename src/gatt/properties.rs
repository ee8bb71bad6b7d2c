//! Interfaces, access flags and the typed property records each node
//! publishes for discovery.

use core::ops::BitOr;

use heapless::Vec;

use super::path::ObjectPath;
use super::uuid::GattUuid;
use crate::error::Error;

/// Interface an operation is invoked through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Interface {
    GattService,
    GattCharacteristic,
    GattDescriptor,
    LeAdvertisement,
    Agent,
}

impl Interface {
    pub const fn name(self) -> &'static str {
        match self {
            Interface::GattService => "org.bluez.GattService1",
            Interface::GattCharacteristic => "org.bluez.GattCharacteristic1",
            Interface::GattDescriptor => "org.bluez.GattDescriptor1",
            Interface::LeAdvertisement => "org.bluez.LEAdvertisement1",
            Interface::Agent => "org.bluez.Agent1",
        }
    }

    /// Resolve an interface name; unknown names are `InvalidInterface`.
    pub fn parse(name: &str) -> Result<Self, Error> {
        [
            Interface::GattService,
            Interface::GattCharacteristic,
            Interface::GattDescriptor,
            Interface::LeAdvertisement,
            Interface::Agent,
        ]
        .into_iter()
        .find(|iface| iface.name() == name)
        .ok_or(Error::InvalidInterface)
    }
}

/// Access capabilities of a characteristic or descriptor.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CharFlags(u8);

impl CharFlags {
    pub const NONE: Self = Self(0);
    pub const READ: Self = Self(1 << 0);
    pub const WRITE: Self = Self(1 << 1);
    pub const WRITE_WITHOUT_RESPONSE: Self = Self(1 << 2);
    pub const NOTIFY: Self = Self(1 << 3);

    const NAMES: [(CharFlags, &'static str); 4] = [
        (Self::READ, "read"),
        (Self::WRITE, "write"),
        (Self::WRITE_WITHOUT_RESPONSE, "write-without-response"),
        (Self::NOTIFY, "notify"),
    ];

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn can_read(self) -> bool {
        self.contains(Self::READ)
    }

    /// Either write flavour.
    pub const fn can_write(self) -> bool {
        self.0 & (Self::WRITE.0 | Self::WRITE_WITHOUT_RESPONSE.0) != 0
    }

    pub const fn can_notify(self) -> bool {
        self.contains(Self::NOTIFY)
    }

    /// Flag names in declaration order.
    pub fn names(self) -> impl Iterator<Item = &'static str> + Clone {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for CharFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Value of a single property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyValue<'a> {
    Str(&'a str),
    Path(&'a ObjectPath),
    Bool(bool),
    U16(u16),
    StrList(&'a [&'a str]),
    Flags(CharFlags),
}

/// Ordered key/value projection of a record.
pub type PropertyList<'a, const N: usize> = Vec<(&'static str, PropertyValue<'a>), N>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServiceProperties {
    pub uuid: GattUuid,
    pub primary: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharacteristicProperties<'a> {
    pub service: &'a ObjectPath,
    pub uuid: GattUuid,
    pub flags: CharFlags,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescriptorProperties<'a> {
    pub characteristic: &'a ObjectPath,
    pub uuid: GattUuid,
    pub flags: CharFlags,
}

/// Property record of one tree node, tagged by its interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeProperties<'a> {
    Service(ServiceProperties),
    Characteristic(CharacteristicProperties<'a>),
    Descriptor(DescriptorProperties<'a>),
}

impl<'a> NodeProperties<'a> {
    pub fn interface(&self) -> Interface {
        match self {
            NodeProperties::Service(_) => Interface::GattService,
            NodeProperties::Characteristic(_) => Interface::GattCharacteristic,
            NodeProperties::Descriptor(_) => Interface::GattDescriptor,
        }
    }

    pub fn uuid(&self) -> GattUuid {
        match self {
            NodeProperties::Service(p) => p.uuid,
            NodeProperties::Characteristic(p) => p.uuid,
            NodeProperties::Descriptor(p) => p.uuid,
        }
    }

    /// Keys and values in publication order.
    pub fn entries(&self) -> PropertyList<'a, 3> {
        let mut out = Vec::new();
        // At most three entries per record, pushes cannot fail.
        match *self {
            NodeProperties::Service(p) => {
                let _ = out.push(("UUID", PropertyValue::Str(p.uuid.as_str())));
                let _ = out.push(("Primary", PropertyValue::Bool(p.primary)));
            }
            NodeProperties::Characteristic(p) => {
                let _ = out.push(("Service", PropertyValue::Path(p.service)));
                let _ = out.push(("UUID", PropertyValue::Str(p.uuid.as_str())));
                let _ = out.push(("Flags", PropertyValue::Flags(p.flags)));
            }
            NodeProperties::Descriptor(p) => {
                let _ = out.push(("Characteristic", PropertyValue::Path(p.characteristic)));
                let _ = out.push(("UUID", PropertyValue::Str(p.uuid.as_str())));
                let _ = out.push(("Flags", PropertyValue::Flags(p.flags)));
            }
        }
        out
    }

    /// Look up one property by key.
    pub fn get(&self, key: &str) -> Option<PropertyValue<'a>> {
        self.entries()
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }
}
