//! Just-works pairing backed by the no-input/no-output agent.
//!
//! Bonds live in RAM only; a power cycle forgets every central.

use core::cell::RefCell;

use defmt::info;
use glove_joystick::agent::{DeviceId, NoInputNoOutputAgent};
use glove_joystick::config::MAX_BONDS;
use heapless::Deque;
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{Address, Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode};
use static_cell::StaticCell;

struct Bond {
    master_id: MasterId,
    key: EncryptionInfo,
    peer_id: IdentityKey,
}

/// Oldest bond is evicted first once `MAX_BONDS` is reached.
struct BondStore(Deque<Bond, MAX_BONDS>);

impl BondStore {
    const fn new() -> Self {
        Self(Deque::new())
    }

    fn store(&mut self, bond: Bond) {
        if let Some(slot) = self.0.iter_mut().find(|b| b.master_id == bond.master_id) {
            *slot = bond;
            return;
        }
        if self.0.is_full() {
            let _ = self.0.pop_front();
        }
        let _ = self.0.push_back(bond);
    }

    fn by_master(&self, master_id: MasterId) -> Option<&Bond> {
        self.0.iter().find(|b| b.master_id == master_id)
    }

    fn by_address(&self, address: Address) -> Option<&Bond> {
        self.0.iter().find(|b| b.peer_id.is_match(address))
    }
}

pub struct PairingHandler {
    agent: &'static NoInputNoOutputAgent,
    bonds: RefCell<BondStore>,
}

fn device(conn: &Connection) -> DeviceId {
    DeviceId::from_le_bytes(conn.peer_address().bytes())
}

impl SecurityHandler for PairingHandler {
    fn io_capabilities(&self) -> IoCapabilities {
        IoCapabilities::None
    }

    fn can_bond(&self, conn: &Connection) -> bool {
        self.agent.request_authorization(device(conn)).is_ok()
    }

    fn on_bonded(
        &self,
        conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        peer_id: IdentityKey,
    ) {
        info!("bonded with {}", device(conn).0);
        self.bonds.borrow_mut().store(Bond {
            master_id,
            key,
            peer_id,
        });
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        self.bonds.borrow().by_master(master_id).map(|b| b.key)
    }

    fn get_peripheral_key(&self, conn: &Connection) -> Option<(MasterId, EncryptionInfo)> {
        self.bonds
            .borrow()
            .by_address(conn.peer_address())
            .map(|b| (b.master_id, b.key))
    }

    fn on_security_update(&self, conn: &Connection, mode: SecurityMode) {
        info!("security mode for {} now {}", device(conn).0, mode);
    }
}

pub fn pairing_handler(agent: &'static NoInputNoOutputAgent) -> &'static PairingHandler {
    static HANDLER: StaticCell<PairingHandler> = StaticCell::new();
    HANDLER.init(PairingHandler {
        agent,
        bonds: RefCell::new(BondStore::new()),
    })
}
