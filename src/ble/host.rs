//! SoftDevice side of the startup registration.
//!
//! The SoftDevice owns the attribute table, the advertising set and the
//! security handler. Registering the service tree walks it once, creates
//! one SoftDevice characteristic per tree characteristic and records the
//! assigned handles so inbound writes can find their way back.

use defmt::{info, Format};
use glove_joystick::advertisement::{AdvPayload, Advertisement};
use glove_joystick::agent::{IoCapability, NoInputNoOutputAgent};
use glove_joystick::config::AdapterConfig;
use glove_joystick::gatt::{
    AttributeTable, CharFlags, DescKind, GattApplication, Interface, NodeId, ReadOptions, Value,
};
use glove_joystick::registration::{ApplicationOptions, BluetoothHost};
use glove_joystick::Error;
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::{peripheral, SecurityMode, Uuid};
use nrf_softdevice::{raw, Softdevice};

#[derive(Clone, Copy, Debug, Format)]
pub enum HostError {
    /// Only discoverable operation is supported.
    NotDiscoverable,
    /// `sd_ble_gap_device_name_set` returned this code.
    DeviceName(u32),
    /// The SoftDevice refused a service, characteristic or descriptor.
    Service,
    /// The service tree could not produce a value.
    Tree(Error),
    /// The security handler only implements just-works pairing.
    Capability,
}

/// Everything the connection loop needs once registration is done.
pub struct Registered {
    pub table: AttributeTable,
    pub adv_data: AdvPayload,
    pub scan_data: &'static [u8],
    pub advertising: peripheral::Config,
}

pub struct SoftdeviceHost<'a> {
    sd: &'a mut Softdevice,
    table: AttributeTable,
    adv_data: AdvPayload,
    scan_data: &'static [u8],
    advertising: peripheral::Config,
    agent_registered: bool,
}

impl<'a> SoftdeviceHost<'a> {
    pub fn new(sd: &'a mut Softdevice) -> Self {
        Self {
            sd,
            table: AttributeTable::new(),
            adv_data: AdvPayload::new(),
            scan_data: &[],
            advertising: peripheral::Config::default(),
            agent_registered: false,
        }
    }

    pub fn finish(self) -> Registered {
        Registered {
            table: self.table,
            adv_data: self.adv_data,
            scan_data: self.scan_data,
            advertising: self.advertising,
        }
    }
}

impl BluetoothHost for SoftdeviceHost<'_> {
    type Error = HostError;

    fn configure_adapter(&mut self, config: &AdapterConfig) -> Result<(), HostError> {
        if !config.discoverable {
            return Err(HostError::NotDiscoverable);
        }

        // Open write permission is never granted to the peer.
        let perm: raw::ble_gap_conn_sec_mode_t = unsafe { core::mem::zeroed() };
        let ret = unsafe {
            raw::sd_ble_gap_device_name_set(
                &perm,
                config.alias.as_ptr(),
                config.alias.len() as u16,
            )
        };
        if ret != raw::NRF_SUCCESS {
            return Err(HostError::DeviceName(ret));
        }

        // SoftDevice advertising timeout is in units of 10 ms.
        self.advertising.timeout = match config.discoverable_timeout_secs {
            0 => None,
            secs => Some(secs.saturating_mul(100).min(u16::MAX as u32) as u16),
        };
        Ok(())
    }

    fn register_application(
        &mut self,
        app: &GattApplication,
        options: &ApplicationOptions,
    ) -> Result<(), HostError> {
        let security = if options.require_authentication {
            SecurityMode::JustWorks
        } else {
            SecurityMode::Open
        };

        let mut service = ServiceBuilder::new(self.sd, Uuid::new_16(app.service_uuid().short()))
            .map_err(|_| HostError::Service)?;

        for id in app.characteristics() {
            let node = NodeId::Characteristic(id);
            let flags = app.flags(node);
            let value = initial_value(app, node, flags)?;

            let mut characteristic = service
                .add_characteristic(
                    Uuid::new_16(app.char_kind(id).uuid().short()),
                    Attribute::new(value.as_slice()).security(security),
                    Metadata::new(properties(flags)),
                )
                .map_err(|_| HostError::Service)?;

            let mut cccd = None;
            for &desc in app.descriptors_of(id) {
                match app.desc_kind(desc) {
                    DescKind::ReportReference => {
                        let options = ReadOptions::at(0);
                        let value = app
                            .read_value(desc.into(), Interface::GattDescriptor, &options)
                            .map_err(HostError::Tree)?;
                        characteristic
                            .add_descriptor(
                                Uuid::new_16(DescKind::ReportReference.uuid().short()),
                                Attribute::new(value.as_slice()).security(security),
                            )
                            .map_err(|_| HostError::Service)?;
                    }
                    // Generated by the SoftDevice for notifying characteristics.
                    DescKind::ClientConfiguration => cccd = Some(desc),
                }
            }

            let handles = characteristic.build();
            self.table
                .bind(handles.value_handle, node)
                .map_err(HostError::Tree)?;
            if let Some(desc) = cccd {
                self.table
                    .bind(handles.cccd_handle, desc.into())
                    .map_err(HostError::Tree)?;
            }
        }

        let _ = service.build();
        info!("HID service registered, {} handles bound", self.table.len());
        Ok(())
    }

    fn register_advertisement(&mut self, advertisement: &Advertisement) -> Result<(), HostError> {
        self.adv_data = advertisement.adv_data().map_err(HostError::Tree)?;
        self.scan_data = advertisement.scan_data();
        Ok(())
    }

    fn register_agent(
        &mut self,
        _agent: &NoInputNoOutputAgent,
        capability: IoCapability,
    ) -> Result<(), HostError> {
        if capability != IoCapability::NoInputNoOutput {
            return Err(HostError::Capability);
        }
        self.agent_registered = true;
        Ok(())
    }

    fn request_default_agent(&mut self, _agent: &NoInputNoOutputAgent) -> Result<(), HostError> {
        if !self.agent_registered {
            return Err(HostError::Capability);
        }
        Ok(())
    }
}

/// Value the SoftDevice starts out with. Write-only attributes hold a
/// single zero byte.
fn initial_value(
    app: &GattApplication,
    node: NodeId,
    flags: CharFlags,
) -> Result<Value, HostError> {
    if flags.can_read() {
        app.read_value(node, Interface::GattCharacteristic, &ReadOptions::at(0))
            .map_err(HostError::Tree)
    } else {
        Value::from_slice(&[0]).map_err(|_| HostError::Tree(Error::BufferOverflow))
    }
}

fn properties(flags: CharFlags) -> Properties {
    let mut props = Properties::new();
    if flags.contains(CharFlags::READ) {
        props = props.read();
    }
    if flags.contains(CharFlags::WRITE) {
        props = props.write();
    }
    if flags.contains(CharFlags::WRITE_WITHOUT_RESPONSE) {
        props = props.write_without_response();
    }
    if flags.contains(CharFlags::NOTIFY) {
        props = props.notify();
    }
    props
}
