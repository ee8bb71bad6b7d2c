//! The HID service tree.
//!
//! One service, six characteristics and two descriptors, built once and kept
//! for the lifetime of the program. Nodes live in fixed arrays and refer to
//! each other through index handles ([`CharId`], [`DescId`]); the only
//! runtime-mutable state is held in atomics so the tree can be shared between
//! the dispatch context and the sampling task.

use core::sync::atomic::{AtomicU8, Ordering};

use heapless::Vec;

use super::notify::{ClientConfig, NotifyFlag, Subscription};
use super::path::ObjectPath;
use super::properties::{
    CharFlags, CharacteristicProperties, DescriptorProperties, Interface, NodeProperties,
    ServiceProperties,
};
use super::uuid::{self, GattUuid};
use crate::error::Error;
use crate::hid::descriptor::{
    HID_INFORMATION, INPUT_REPORT_REFERENCE, JOYSTICK_REPORT_DESCRIPTOR, PNP_ID,
    PROTOCOL_MODE_REPORT,
};
use crate::hid::{validate_descriptor, JoystickReport};

pub const CHARACTERISTIC_COUNT: usize = 6;
pub const DESCRIPTOR_COUNT: usize = 2;

/// Largest attribute value served (the report map).
pub const MAX_VALUE_LEN: usize = 64;

/// Attribute value returned by reads.
pub type Value = Vec<u8, MAX_VALUE_LEN>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CharId(u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DescId(u8);

impl CharId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl DescId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to any node of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeId {
    Service,
    Characteristic(CharId),
    Descriptor(DescId),
}

impl From<CharId> for NodeId {
    fn from(id: CharId) -> Self {
        NodeId::Characteristic(id)
    }
}

impl From<DescId> for NodeId {
    fn from(id: DescId) -> Self {
        NodeId::Descriptor(id)
    }
}

/// Role of a characteristic inside the HID service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CharKind {
    HidInformation,
    ControlPoint,
    ProtocolMode,
    ReportMap,
    PnpId,
    InputReport,
}

impl CharKind {
    /// Characteristics in registration order.
    pub const ALL: [CharKind; CHARACTERISTIC_COUNT] = [
        CharKind::HidInformation,
        CharKind::ControlPoint,
        CharKind::ProtocolMode,
        CharKind::ReportMap,
        CharKind::PnpId,
        CharKind::InputReport,
    ];

    pub const fn uuid(self) -> GattUuid {
        match self {
            CharKind::HidInformation => uuid::HID_INFORMATION,
            CharKind::ControlPoint => uuid::HID_CONTROL_POINT,
            CharKind::ProtocolMode => uuid::PROTOCOL_MODE,
            CharKind::ReportMap => uuid::REPORT_MAP,
            CharKind::PnpId => uuid::PNP_ID,
            CharKind::InputReport => uuid::REPORT,
        }
    }

    pub const fn flags(self) -> CharFlags {
        match self {
            CharKind::HidInformation | CharKind::ReportMap | CharKind::PnpId => CharFlags::READ,
            CharKind::ControlPoint => CharFlags::WRITE_WITHOUT_RESPONSE,
            CharKind::ProtocolMode => CharFlags::READ.union(CharFlags::WRITE_WITHOUT_RESPONSE),
            CharKind::InputReport => CharFlags::READ.union(CharFlags::NOTIFY),
        }
    }

    fn descriptors(self) -> &'static [DescId] {
        match self {
            CharKind::InputReport => &INPUT_REPORT_DESCRIPTORS,
            _ => &[],
        }
    }
}

/// Role of a descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DescKind {
    ReportReference,
    ClientConfiguration,
}

impl DescKind {
    pub const fn uuid(self) -> GattUuid {
        match self {
            DescKind::ReportReference => uuid::REPORT_REFERENCE,
            DescKind::ClientConfiguration => uuid::CLIENT_CHARACTERISTIC_CONFIGURATION,
        }
    }

    pub const fn flags(self) -> CharFlags {
        match self {
            DescKind::ReportReference => CharFlags::READ,
            DescKind::ClientConfiguration => CharFlags::READ.union(CharFlags::WRITE),
        }
    }
}

const INPUT_REPORT_ID: CharId = CharId(5);
const INPUT_REPORT_REFERENCE_ID: DescId = DescId(0);
const INPUT_REPORT_CCCD_ID: DescId = DescId(1);
static INPUT_REPORT_DESCRIPTORS: [DescId; DESCRIPTOR_COUNT] =
    [INPUT_REPORT_REFERENCE_ID, INPUT_REPORT_CCCD_ID];

/// Options accompanying a read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadOptions {
    /// First byte of the value to return.
    pub offset: u16,
}

impl ReadOptions {
    pub const fn at(offset: u16) -> Self {
        Self { offset }
    }
}

struct Service {
    path: ObjectPath,
    uuid: GattUuid,
    primary: bool,
}

struct Characteristic {
    path: ObjectPath,
    kind: CharKind,
    notifying: NotifyFlag,
}

impl Characteristic {
    fn new(service: &ObjectPath, index: usize) -> Result<Self, Error> {
        Ok(Self {
            path: service.child("char", index)?,
            kind: CharKind::ALL[index],
            notifying: NotifyFlag::new(),
        })
    }
}

struct Descriptor {
    path: ObjectPath,
    kind: DescKind,
    characteristic: CharId,
}

/// The exported GATT application: root path plus the HID service tree.
pub struct GattApplication {
    root: ObjectPath,
    service: Service,
    characteristics: [Characteristic; CHARACTERISTIC_COUNT],
    descriptors: [Descriptor; DESCRIPTOR_COUNT],
    /// Input report CCCD, the only descriptor with a mutable value.
    cccd: ClientConfig,
    protocol_mode: AtomicU8,
}

impl GattApplication {
    /// Build the tree below `root`.
    ///
    /// Fails with `DescriptorMismatch` if the report map does not describe
    /// the report the encoder produces, or with a path error if `root` is
    /// malformed or too long.
    pub fn new(root: &str) -> Result<Self, Error> {
        validate_descriptor(JOYSTICK_REPORT_DESCRIPTOR)?;

        let root = ObjectPath::new(root)?;
        let service_path = root.child("service", 0)?;

        let characteristics = [
            Characteristic::new(&service_path, 0)?,
            Characteristic::new(&service_path, 1)?,
            Characteristic::new(&service_path, 2)?,
            Characteristic::new(&service_path, 3)?,
            Characteristic::new(&service_path, 4)?,
            Characteristic::new(&service_path, 5)?,
        ];

        let report_path = &characteristics[INPUT_REPORT_ID.index()].path;
        let descriptors = [
            Descriptor {
                path: report_path.child("desc", 0)?,
                kind: DescKind::ReportReference,
                characteristic: INPUT_REPORT_ID,
            },
            Descriptor {
                path: report_path.child("desc", 1)?,
                kind: DescKind::ClientConfiguration,
                characteristic: INPUT_REPORT_ID,
            },
        ];

        info!("GATT tree built at {}", root.as_str());

        Ok(Self {
            root,
            service: Service {
                path: service_path,
                uuid: uuid::HID_SERVICE,
                primary: true,
            },
            characteristics,
            descriptors,
            cccd: ClientConfig::new(),
            protocol_mode: AtomicU8::new(PROTOCOL_MODE_REPORT),
        })
    }

    // Structure

    /// Application root the tree is registered under.
    pub fn root_path(&self) -> &ObjectPath {
        &self.root
    }

    pub fn service_uuid(&self) -> GattUuid {
        self.service.uuid
    }

    /// Characteristics in registration order.
    pub fn characteristics(&self) -> impl Iterator<Item = CharId> + Clone {
        (0..CHARACTERISTIC_COUNT as u8).map(CharId)
    }

    /// Descriptors owned by `id`, in registration order.
    pub fn descriptors_of(&self, id: CharId) -> &'static [DescId] {
        self.characteristic(id).kind.descriptors()
    }

    pub fn char_kind(&self, id: CharId) -> CharKind {
        self.characteristic(id).kind
    }

    pub fn desc_kind(&self, id: DescId) -> DescKind {
        self.descriptor(id).kind
    }

    /// Owning characteristic of a descriptor.
    pub fn owner_of(&self, id: DescId) -> CharId {
        self.descriptor(id).characteristic
    }

    /// Characteristic of the given kind.
    pub fn characteristic_of_kind(&self, kind: CharKind) -> CharId {
        // `CharKind::ALL` is declared in discriminant order.
        CharId(kind as u8)
    }

    pub fn input_report(&self) -> CharId {
        INPUT_REPORT_ID
    }

    pub fn input_report_cccd(&self) -> DescId {
        INPUT_REPORT_CCCD_ID
    }

    fn characteristic(&self, id: CharId) -> &Characteristic {
        &self.characteristics[id.index()]
    }

    fn descriptor(&self, id: DescId) -> &Descriptor {
        &self.descriptors[id.index()]
    }

    // Discovery

    /// Resolve an object path to its node.
    pub fn find(&self, path: &str) -> Result<NodeId, Error> {
        if self.service.path == path {
            return Ok(NodeId::Service);
        }
        if let Some(i) = self.characteristics.iter().position(|c| c.path == path) {
            return Ok(NodeId::Characteristic(CharId(i as u8)));
        }
        if let Some(i) = self.descriptors.iter().position(|d| d.path == path) {
            return Ok(NodeId::Descriptor(DescId(i as u8)));
        }
        Err(Error::UnknownObject)
    }

    pub fn path(&self, node: NodeId) -> &ObjectPath {
        match node {
            NodeId::Service => &self.service.path,
            NodeId::Characteristic(id) => &self.characteristic(id).path,
            NodeId::Descriptor(id) => &self.descriptor(id).path,
        }
    }

    /// Interface the node implements.
    pub fn interface(&self, node: NodeId) -> Interface {
        match node {
            NodeId::Service => Interface::GattService,
            NodeId::Characteristic(_) => Interface::GattCharacteristic,
            NodeId::Descriptor(_) => Interface::GattDescriptor,
        }
    }

    pub fn flags(&self, node: NodeId) -> CharFlags {
        match node {
            NodeId::Service => CharFlags::NONE,
            NodeId::Characteristic(id) => self.characteristic(id).kind.flags(),
            NodeId::Descriptor(id) => self.descriptor(id).kind.flags(),
        }
    }

    /// Declared properties of `node`.
    pub fn properties(&self, node: NodeId) -> NodeProperties<'_> {
        match node {
            NodeId::Service => NodeProperties::Service(ServiceProperties {
                uuid: self.service.uuid,
                primary: self.service.primary,
            }),
            NodeId::Characteristic(id) => {
                let kind = self.characteristic(id).kind;
                NodeProperties::Characteristic(CharacteristicProperties {
                    service: &self.service.path,
                    uuid: kind.uuid(),
                    flags: kind.flags(),
                })
            }
            NodeId::Descriptor(id) => {
                let desc = self.descriptor(id);
                NodeProperties::Descriptor(DescriptorProperties {
                    characteristic: &self.characteristic(desc.characteristic).path,
                    uuid: desc.kind.uuid(),
                    flags: desc.kind.flags(),
                })
            }
        }
    }

    /// `GetAll(interface)`: the property record, if `interface` matches.
    pub fn get_all(&self, node: NodeId, interface: Interface) -> Result<NodeProperties<'_>, Error> {
        self.check_interface(node, interface)?;
        Ok(self.properties(node))
    }

    fn check_interface(&self, node: NodeId, interface: Interface) -> Result<(), Error> {
        if self.interface(node) != interface {
            debug!("interface mismatch on {}", self.path(node).as_str());
            return Err(Error::InvalidInterface);
        }
        Ok(())
    }

    // Values

    /// `ReadValue(options)`.
    pub fn read_value(
        &self,
        node: NodeId,
        interface: Interface,
        options: &ReadOptions,
    ) -> Result<Value, Error> {
        self.check_interface(node, interface)?;
        if !self.flags(node).can_read() {
            return Err(Error::NotSupported);
        }

        let mut full = Value::new();
        let input_report;
        let protocol_mode;
        let cccd;
        let bytes: &[u8] = match node {
            NodeId::Service => return Err(Error::NotSupported),
            NodeId::Characteristic(id) => match self.characteristic(id).kind {
                CharKind::HidInformation => &HID_INFORMATION,
                CharKind::ReportMap => JOYSTICK_REPORT_DESCRIPTOR,
                CharKind::PnpId => &PNP_ID,
                CharKind::ProtocolMode => {
                    protocol_mode = [self.protocol_mode()];
                    &protocol_mode
                }
                CharKind::InputReport => {
                    input_report = JoystickReport::neutral().to_bytes();
                    &input_report
                }
                CharKind::ControlPoint => return Err(Error::NotSupported),
            },
            NodeId::Descriptor(id) => {
                let desc = self.descriptor(id);
                match desc.kind {
                    DescKind::ReportReference => &INPUT_REPORT_REFERENCE,
                    DescKind::ClientConfiguration => {
                        cccd = self.cccd.to_bytes();
                        &cccd
                    }
                }
            }
        };

        let offset = options.offset as usize;
        if offset > bytes.len() {
            return Err(Error::InvalidOffset);
        }
        full.extend_from_slice(&bytes[offset..])
            .map_err(|_| Error::BufferOverflow)?;
        Ok(full)
    }

    /// `WriteValue(bytes)`.
    pub fn write_value(
        &self,
        node: NodeId,
        interface: Interface,
        data: &[u8],
    ) -> Result<(), Error> {
        self.check_interface(node, interface)?;
        if !self.flags(node).can_write() {
            return Err(Error::NotSupported);
        }

        match node {
            NodeId::Service => Err(Error::NotSupported),
            NodeId::Characteristic(id) => match self.characteristic(id).kind {
                CharKind::ControlPoint => {
                    debug!("control point written: {=[u8]}", data);
                    Ok(())
                }
                CharKind::ProtocolMode => {
                    let mode = *data.first().ok_or(Error::InvalidArgument)?;
                    self.protocol_mode.store(mode, Ordering::Release);
                    info!("protocol mode set to {}", mode);
                    Ok(())
                }
                _ => Err(Error::NotSupported),
            },
            NodeId::Descriptor(id) => {
                let desc = self.descriptor(id);
                match desc.kind {
                    DescKind::ClientConfiguration => {
                        self.cccd.write(data)?;
                        let enabled = self.cccd.notifications_enabled();
                        self.characteristic(desc.characteristic)
                            .notifying
                            .set(enabled);
                        info!("notifications enabled: {}", enabled);
                        Ok(())
                    }
                    DescKind::ReportReference => Err(Error::NotSupported),
                }
            }
        }
    }

    /// Current Protocol Mode byte (boot = 0, report = 1).
    pub fn protocol_mode(&self) -> u8 {
        self.protocol_mode.load(Ordering::Acquire)
    }

    // Notify

    /// `StartNotify()`.
    pub fn start_notify(&self, node: NodeId, interface: Interface) -> Result<(), Error> {
        self.notify_flag(node, interface)?.set(true);
        debug!("start notify on {}", self.path(node).as_str());
        Ok(())
    }

    /// `StopNotify()`.
    pub fn stop_notify(&self, node: NodeId, interface: Interface) -> Result<(), Error> {
        self.notify_flag(node, interface)?.set(false);
        debug!("stop notify on {}", self.path(node).as_str());
        Ok(())
    }

    fn notify_flag(&self, node: NodeId, interface: Interface) -> Result<&NotifyFlag, Error> {
        self.check_interface(node, interface)?;
        match node {
            NodeId::Characteristic(id) if self.characteristic(id).kind.flags().can_notify() => {
                Ok(&self.characteristic(id).notifying)
            }
            _ => Err(Error::NotSupported),
        }
    }

    pub fn is_notifying(&self, id: CharId) -> bool {
        self.characteristic(id).notifying.get()
    }

    pub fn subscription(&self, id: CharId) -> Subscription {
        self.characteristic(id).notifying.state()
    }

    /// Current CCCD bitmask of the input report.
    pub fn cccd_value(&self) -> u16 {
        self.cccd.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::APPLICATION_PATH;
    use crate::gatt::properties::PropertyValue;

    fn app() -> GattApplication {
        GattApplication::new(APPLICATION_PATH).unwrap()
    }

    fn char_node(app: &GattApplication, kind: CharKind) -> NodeId {
        NodeId::Characteristic(app.characteristic_of_kind(kind))
    }

    fn read(app: &GattApplication, node: NodeId) -> Result<Value, Error> {
        app.read_value(node, app.interface(node), &ReadOptions::default())
    }

    #[test]
    fn paths_follow_layout() {
        let app = app();
        assert_eq!(app.root_path(), "/glove/hid");
        assert_eq!(app.path(NodeId::Service), "/glove/hid/service0");
        let names = ["char0", "char1", "char2", "char3", "char4", "char5"];
        for (id, name) in app.characteristics().zip(names) {
            let path = app.path(NodeId::Characteristic(id));
            assert_eq!(path.parent(), Some("/glove/hid/service0"));
            assert!(path.as_str().ends_with(name));
        }
        assert_eq!(
            app.path(NodeId::Descriptor(app.input_report_cccd())),
            "/glove/hid/service0/char5/desc1"
        );
    }

    #[test]
    fn find_resolves_every_node() {
        let app = app();
        assert_eq!(app.find("/glove/hid/service0"), Ok(NodeId::Service));
        assert_eq!(
            app.find("/glove/hid/service0/char3"),
            Ok(NodeId::Characteristic(app.characteristic_of_kind(CharKind::ReportMap)))
        );
        assert_eq!(
            app.find("/glove/hid/service0/char5/desc0"),
            Ok(NodeId::Descriptor(DescId(0)))
        );
        assert_eq!(app.find("/glove/hid/service0/char6"), Err(Error::UnknownObject));
        assert_eq!(app.find("/glove/hid"), Err(Error::UnknownObject));
    }

    #[test]
    fn rejects_bad_root() {
        assert!(matches!(GattApplication::new("glove"), Err(Error::InvalidArgument)));
        assert!(matches!(
            GattApplication::new(&"/abcdefgh".repeat(6)),
            Err(Error::BufferOverflow)
        ));
    }

    #[test]
    fn only_input_report_has_descriptors() {
        let app = app();
        for id in app.characteristics() {
            let descs = app.descriptors_of(id);
            if app.char_kind(id) == CharKind::InputReport {
                assert_eq!(descs.len(), 2);
                assert_eq!(app.desc_kind(descs[0]), DescKind::ReportReference);
                assert_eq!(app.desc_kind(descs[1]), DescKind::ClientConfiguration);
                assert!(descs.iter().all(|d| app.owner_of(*d) == id));
            } else {
                assert!(descs.is_empty());
            }
        }
    }

    #[test]
    fn declared_flags() {
        let app = app();
        let names = |kind| {
            app.flags(char_node(&app, kind))
                .names()
                .collect::<std::vec::Vec<_>>()
        };
        assert_eq!(names(CharKind::HidInformation), ["read"]);
        assert_eq!(names(CharKind::ControlPoint), ["write-without-response"]);
        assert_eq!(names(CharKind::ProtocolMode), ["read", "write-without-response"]);
        assert_eq!(names(CharKind::ReportMap), ["read"]);
        assert_eq!(names(CharKind::PnpId), ["read"]);
        assert_eq!(names(CharKind::InputReport), ["read", "notify"]);
    }

    #[test]
    fn descriptor_properties_point_at_owner() {
        let app = app();
        let props = app.properties(NodeId::Descriptor(app.input_report_cccd()));
        assert_eq!(props.interface(), Interface::GattDescriptor);
        assert_eq!(
            props.get("Characteristic"),
            Some(PropertyValue::Path(app.path(NodeId::Characteristic(app.input_report()))))
        );
        assert_eq!(
            props.get("UUID"),
            Some(PropertyValue::Str("00002902-0000-1000-8000-00805f9b34fb"))
        );
    }

    #[test]
    fn get_all_checks_interface() {
        let app = app();
        assert!(app.get_all(NodeId::Service, Interface::GattService).is_ok());
        assert_eq!(
            app.get_all(NodeId::Service, Interface::GattCharacteristic),
            Err(Error::InvalidInterface)
        );
    }

    #[test]
    fn fixed_reads() {
        let app = app();
        assert_eq!(
            read(&app, char_node(&app, CharKind::HidInformation)).unwrap(),
            [0x11, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            read(&app, char_node(&app, CharKind::ReportMap)).unwrap(),
            JOYSTICK_REPORT_DESCRIPTOR
        );
        assert_eq!(
            read(&app, char_node(&app, CharKind::PnpId)).unwrap(),
            [0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x01]
        );
        assert_eq!(
            read(&app, char_node(&app, CharKind::InputReport)).unwrap(),
            JoystickReport::neutral().to_bytes()
        );
        assert_eq!(read(&app, NodeId::Descriptor(DescId(0))).unwrap(), [0x01, 0x01]);
        assert_eq!(read(&app, NodeId::Descriptor(DescId(1))).unwrap(), [0x00, 0x00]);
    }

    #[test]
    fn report_map_unchanged_by_writes() {
        let app = app();
        let map = char_node(&app, CharKind::ReportMap);
        let before = read(&app, map).unwrap();

        let cccd = NodeId::Descriptor(app.input_report_cccd());
        app.write_value(cccd, Interface::GattDescriptor, &[0x01, 0x00])
            .unwrap();
        let mode = char_node(&app, CharKind::ProtocolMode);
        app.write_value(mode, Interface::GattCharacteristic, &[0x00])
            .unwrap();
        let control = char_node(&app, CharKind::ControlPoint);
        app.write_value(control, Interface::GattCharacteristic, &[0x01])
            .unwrap();

        let after = read(&app, map).unwrap();
        assert_eq!(before, after);
        assert_eq!(after, JOYSTICK_REPORT_DESCRIPTOR);
    }

    #[test]
    fn report_reference_unchanged_by_cccd_write() {
        let app = app();
        let cccd = NodeId::Descriptor(app.input_report_cccd());
        app.write_value(cccd, Interface::GattDescriptor, &[0x03, 0x00])
            .unwrap();
        assert_eq!(read(&app, NodeId::Descriptor(DescId(0))).unwrap(), [0x01, 0x01]);
        assert_eq!(read(&app, cccd).unwrap(), [0x03, 0x00]);
        assert_eq!(app.cccd_value(), 0x0003);
    }

    #[test]
    fn read_with_wrong_interface_fails() {
        let app = app();
        let node = char_node(&app, CharKind::ReportMap);
        assert_eq!(
            app.read_value(node, Interface::GattDescriptor, &ReadOptions::default()),
            Err(Error::InvalidInterface)
        );
    }

    #[test]
    fn read_without_capability_fails() {
        let app = app();
        assert_eq!(
            read(&app, char_node(&app, CharKind::ControlPoint)),
            Err(Error::NotSupported)
        );
        assert_eq!(
            app.read_value(NodeId::Service, Interface::GattService, &ReadOptions::default()),
            Err(Error::NotSupported)
        );
    }

    #[test]
    fn read_honours_offset() {
        let app = app();
        let node = char_node(&app, CharKind::ReportMap);
        let tail = app
            .read_value(node, Interface::GattCharacteristic, &ReadOptions::at(56))
            .unwrap();
        assert_eq!(tail, [0xC0, 0xC0]);
        let empty = app
            .read_value(node, Interface::GattCharacteristic, &ReadOptions::at(58))
            .unwrap();
        assert!(empty.is_empty());
        assert_eq!(
            app.read_value(node, Interface::GattCharacteristic, &ReadOptions::at(59)),
            Err(Error::InvalidOffset)
        );
    }

    #[test]
    fn protocol_mode_round_trip() {
        let app = app();
        let node = char_node(&app, CharKind::ProtocolMode);
        assert_eq!(read(&app, node).unwrap(), [0x01]);
        app.write_value(node, Interface::GattCharacteristic, &[0x00]).unwrap();
        assert_eq!(app.protocol_mode(), 0);
        // Unvalidated: any byte is stored.
        app.write_value(node, Interface::GattCharacteristic, &[0x7F, 0x01]).unwrap();
        assert_eq!(read(&app, node).unwrap(), [0x7F]);
    }

    #[test]
    fn protocol_mode_empty_write_rejected() {
        let app = app();
        let node = char_node(&app, CharKind::ProtocolMode);
        assert_eq!(
            app.write_value(node, Interface::GattCharacteristic, &[]),
            Err(Error::InvalidArgument)
        );
        assert_eq!(app.protocol_mode(), 1);
    }

    #[test]
    fn control_point_is_a_sink() {
        let app = app();
        let node = char_node(&app, CharKind::ControlPoint);
        assert!(app.write_value(node, Interface::GattCharacteristic, &[0x00]).is_ok());
        assert!(app.write_value(node, Interface::GattCharacteristic, &[]).is_ok());
        assert!(!app.is_notifying(app.input_report()));
        assert_eq!(app.protocol_mode(), 1);
    }

    #[test]
    fn write_read_only_fails() {
        let app = app();
        assert_eq!(
            app.write_value(
                char_node(&app, CharKind::ReportMap),
                Interface::GattCharacteristic,
                &[0x00]
            ),
            Err(Error::NotSupported)
        );
        assert_eq!(
            app.write_value(NodeId::Descriptor(DescId(0)), Interface::GattDescriptor, &[0x00]),
            Err(Error::NotSupported)
        );
    }

    #[test]
    fn cccd_write_toggles_notifying() {
        let app = app();
        let cccd = NodeId::Descriptor(app.input_report_cccd());
        let report = app.input_report();

        assert_eq!(app.subscription(report), Subscription::Unsubscribed);
        app.write_value(cccd, Interface::GattDescriptor, &[0x01, 0x00]).unwrap();
        assert!(app.is_notifying(report));
        assert_eq!(app.cccd_value(), 0x0001);
        assert_eq!(read(&app, cccd).unwrap(), [0x01, 0x00]);

        app.write_value(cccd, Interface::GattDescriptor, &[0x00, 0x00]).unwrap();
        assert!(!app.is_notifying(report));
        assert_eq!(app.cccd_value(), 0x0000);
    }

    #[test]
    fn cccd_only_bit0_subscribes() {
        let app = app();
        let cccd = NodeId::Descriptor(app.input_report_cccd());
        app.write_value(cccd, Interface::GattDescriptor, &[0x02]).unwrap();
        assert!(!app.is_notifying(app.input_report()));
        app.write_value(cccd, Interface::GattDescriptor, &[0x03]).unwrap();
        assert!(app.is_notifying(app.input_report()));
    }

    #[test]
    fn cccd_empty_write_keeps_state() {
        let app = app();
        let cccd = NodeId::Descriptor(app.input_report_cccd());
        app.write_value(cccd, Interface::GattDescriptor, &[0x01, 0x00]).unwrap();
        assert_eq!(
            app.write_value(cccd, Interface::GattDescriptor, &[]),
            Err(Error::InvalidArgument)
        );
        assert!(app.is_notifying(app.input_report()));
    }

    #[test]
    fn cccd_write_through_characteristic_interface_fails() {
        let app = app();
        let cccd = NodeId::Descriptor(app.input_report_cccd());
        assert_eq!(
            app.write_value(cccd, Interface::GattCharacteristic, &[0x01, 0x00]),
            Err(Error::InvalidInterface)
        );
        assert!(!app.is_notifying(app.input_report()));
    }

    #[test]
    fn start_stop_notify() {
        let app = app();
        let node = NodeId::Characteristic(app.input_report());
        app.start_notify(node, Interface::GattCharacteristic).unwrap();
        assert!(app.is_notifying(app.input_report()));
        // CCCD value is not touched.
        assert_eq!(app.cccd_value(), 0);
        app.stop_notify(node, Interface::GattCharacteristic).unwrap();
        assert!(!app.is_notifying(app.input_report()));
    }

    #[test]
    fn notify_last_writer_wins() {
        let app = app();
        let node = NodeId::Characteristic(app.input_report());
        let cccd = NodeId::Descriptor(app.input_report_cccd());
        app.write_value(cccd, Interface::GattDescriptor, &[0x01, 0x00]).unwrap();
        app.stop_notify(node, Interface::GattCharacteristic).unwrap();
        assert!(!app.is_notifying(app.input_report()));
        app.start_notify(node, Interface::GattCharacteristic).unwrap();
        app.write_value(cccd, Interface::GattDescriptor, &[0x00, 0x00]).unwrap();
        assert!(!app.is_notifying(app.input_report()));
    }

    #[test]
    fn start_notify_without_capability_fails() {
        let app = app();
        let node = char_node(&app, CharKind::ReportMap);
        assert_eq!(
            app.start_notify(node, Interface::GattCharacteristic),
            Err(Error::NotSupported)
        );
        assert_eq!(
            app.stop_notify(NodeId::Service, Interface::GattService),
            Err(Error::NotSupported)
        );
        assert_eq!(
            app.start_notify(NodeId::Characteristic(app.input_report()), Interface::GattService),
            Err(Error::InvalidInterface)
        );
    }
}
