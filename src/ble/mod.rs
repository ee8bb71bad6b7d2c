//! Bluetooth Low Energy subsystem.
//!
//! Drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Host** - registers the HID service, advertisement and pairing
//!    handler with the SoftDevice at startup.
//! 2. **Server** - routes inbound GATT writes to the service tree and
//!    forwards queued input reports as notifications.
//! 3. **Security** - just-works pairing with in-RAM bonds.
//!
//! Reports travel from the sampling task to the connection task over the
//! [`REPORTS`] channel.

pub mod host;
pub mod security;
pub mod server;

use defmt::info;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use glove_joystick::config::{
    ATT_MTU, DEVICE_NAME, GATTS_ATTR_TAB_SIZE, REPORT_QUEUE_DEPTH,
};
use nrf_softdevice::{raw, Softdevice};

pub use server::Notification;

/// Input reports waiting to be notified.
pub static REPORTS: Channel<CriticalSectionRawMutex, Notification, REPORT_QUEUE_DEPTH> =
    Channel::new();

pub fn enable_softdevice() -> &'static mut Softdevice {
    let config = nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 4,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: ATT_MTU }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: GATTS_ATTR_TAB_SIZE,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: Default::default(),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: DEVICE_NAME.as_ptr() as *const u8 as _,
            current_len: DEVICE_NAME.len() as u16,
            max_len: DEVICE_NAME.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    };

    info!("Enabling SoftDevice");
    Softdevice::enable(&config)
}

#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}
