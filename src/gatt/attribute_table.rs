//! Transport attribute handles mapped back onto tree nodes.
//!
//! The BLE stack assigns a handle to every value and descriptor it
//! registers. Inbound writes arrive by handle; this table routes them to the
//! node they address, through the node's own interface.

use heapless::Vec;

use super::tree::{GattApplication, NodeId, CHARACTERISTIC_COUNT, DESCRIPTOR_COUNT};
use crate::error::Error;

/// Value handles plus the stack-generated CCCD handle.
pub const MAX_HANDLES: usize = CHARACTERISTIC_COUNT + DESCRIPTOR_COUNT;

#[derive(Clone, Debug, Default)]
pub struct AttributeTable {
    entries: Vec<(u16, NodeId), MAX_HANDLES>,
}

impl AttributeTable {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record the handle the stack assigned to `node`.
    ///
    /// Re-binding a handle or a node replaces the earlier entry.
    pub fn bind(&mut self, handle: u16, node: NodeId) -> Result<(), Error> {
        self.entries.retain(|(h, n)| *h != handle && *n != node);
        self.entries
            .push((handle, node))
            .map_err(|_| Error::BufferOverflow)
    }

    pub fn node(&self, handle: u16) -> Option<NodeId> {
        self.entries
            .iter()
            .find_map(|(h, n)| (*h == handle).then_some(*n))
    }

    pub fn handle(&self, node: NodeId) -> Option<u16> {
        self.entries
            .iter()
            .find_map(|(h, n)| (*n == node).then_some(*h))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Route an inbound write. Returns the node that accepted it.
    pub fn dispatch_write(
        &self,
        app: &GattApplication,
        handle: u16,
        data: &[u8],
    ) -> Result<NodeId, Error> {
        let node = self.node(handle).ok_or(Error::UnknownObject)?;
        app.write_value(node, app.interface(node), data)?;
        Ok(node)
    }
}
