//! `GetManagedObjects()`: the whole tree as one enumerable map.
//!
//! Walks service, then each characteristic followed by its descriptors.
//! Nothing is cached; every walk reflects the tree as built.

use super::path::ObjectPath;
use super::properties::{Interface, NodeProperties};
use super::tree::{CharId, GattApplication, NodeId, CHARACTERISTIC_COUNT};

/// One entry of the managed-objects map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ManagedObject<'a> {
    pub path: &'a ObjectPath,
    pub node: NodeId,
    pub properties: NodeProperties<'a>,
}

impl ManagedObject<'_> {
    pub fn interface(&self) -> Interface {
        self.properties.interface()
    }
}

#[derive(Clone, Copy, Debug)]
enum Cursor {
    Service,
    Characteristic(u8),
    Descriptor(u8, usize),
    Done,
}

/// Iterator over every node in tree order.
#[derive(Clone)]
pub struct ManagedObjects<'a> {
    app: &'a GattApplication,
    cursor: Cursor,
}

impl<'a> ManagedObjects<'a> {
    fn entry(&self, node: NodeId) -> ManagedObject<'a> {
        ManagedObject {
            path: self.app.path(node),
            node,
            properties: self.app.properties(node),
        }
    }

    /// Number of objects in the map.
    pub fn len(&self) -> usize {
        self.clone().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry for `path`, if the tree has one.
    pub fn get(&self, path: &str) -> Option<ManagedObject<'a>> {
        self.clone().find(|obj| *obj.path == *path)
    }

    /// Number of objects exposing `interface`.
    pub fn count_of(&self, interface: Interface) -> usize {
        self.clone().filter(|obj| obj.interface() == interface).count()
    }
}

impl<'a> Iterator for ManagedObjects<'a> {
    type Item = ManagedObject<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.cursor {
                Cursor::Service => {
                    self.cursor = Cursor::Characteristic(0);
                    return Some(self.entry(NodeId::Service));
                }
                Cursor::Characteristic(i) => {
                    if i as usize >= CHARACTERISTIC_COUNT {
                        self.cursor = Cursor::Done;
                        return None;
                    }
                    self.cursor = Cursor::Descriptor(i, 0);
                    let id = self.app.characteristics().nth(i as usize)?;
                    return Some(self.entry(NodeId::Characteristic(id)));
                }
                Cursor::Descriptor(i, j) => {
                    let owner: Option<CharId> = self.app.characteristics().nth(i as usize);
                    let next = owner.and_then(|id| self.app.descriptors_of(id).get(j).copied());
                    match next {
                        Some(desc) => {
                            self.cursor = Cursor::Descriptor(i, j + 1);
                            return Some(self.entry(NodeId::Descriptor(desc)));
                        }
                        None => self.cursor = Cursor::Characteristic(i + 1),
                    }
                }
                Cursor::Done => return None,
            }
        }
    }
}

impl GattApplication {
    /// Walk the tree for discovery.
    pub fn managed_objects(&self) -> ManagedObjects<'_> {
        ManagedObjects {
            app: self,
            cursor: Cursor::Service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::APPLICATION_PATH;
    use crate::gatt::properties::PropertyValue;
    use crate::gatt::tree::ReadOptions;

    #[test]
    fn counts_per_interface() {
        let app = GattApplication::new(APPLICATION_PATH).unwrap();
        let objects = app.managed_objects();
        assert_eq!(objects.len(), 9);
        assert_eq!(objects.count_of(Interface::GattService), 1);
        assert_eq!(objects.count_of(Interface::GattCharacteristic), 6);
        assert_eq!(objects.count_of(Interface::GattDescriptor), 2);
    }

    #[test]
    fn tree_order() {
        let app = GattApplication::new(APPLICATION_PATH).unwrap();
        let paths: std::vec::Vec<_> = app.managed_objects().map(|o| o.path.as_str()).collect();
        assert_eq!(
            paths,
            [
                "/glove/hid/service0",
                "/glove/hid/service0/char0",
                "/glove/hid/service0/char1",
                "/glove/hid/service0/char2",
                "/glove/hid/service0/char3",
                "/glove/hid/service0/char4",
                "/glove/hid/service0/char5",
                "/glove/hid/service0/char5/desc0",
                "/glove/hid/service0/char5/desc1",
            ]
        );
    }

    #[test]
    fn unchanged_by_activity() {
        let app = GattApplication::new(APPLICATION_PATH).unwrap();
        let before: std::vec::Vec<_> = app.managed_objects().collect();

        let cccd = NodeId::Descriptor(app.input_report_cccd());
        app.write_value(cccd, Interface::GattDescriptor, &[0x01, 0x00])
            .unwrap();
        let _ = app.read_value(cccd, Interface::GattDescriptor, &ReadOptions::default());

        let after: std::vec::Vec<_> = app.managed_objects().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn get_by_path() {
        let app = GattApplication::new(APPLICATION_PATH).unwrap();
        let objects = app.managed_objects();
        let desc = objects.get("/glove/hid/service0/char5/desc0").unwrap();
        assert_eq!(desc.interface(), Interface::GattDescriptor);
        assert_eq!(
            desc.properties.get("Flags"),
            Some(PropertyValue::Flags(crate::gatt::properties::CharFlags::READ))
        );
        assert!(objects.get("/glove/hid").is_none());
    }

    #[test]
    fn service_record() {
        let app = GattApplication::new(APPLICATION_PATH).unwrap();
        let service = app.managed_objects().next().unwrap();
        assert_eq!(service.properties.get("Primary"), Some(PropertyValue::Bool(true)));
    }
}
