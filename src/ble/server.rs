//! GATT server and connection loop.

use defmt::{error, info, warn};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embassy_time::Timer;
use glove_joystick::config::{
    BLE_CONN_INTERVAL_MAX, BLE_CONN_INTERVAL_MIN, BLE_SLAVE_LATENCY, BLE_SUP_TIMEOUT,
    REPORT_QUEUE_DEPTH,
};
use glove_joystick::gatt::{
    AttributeTable, GattApplication, Interface, NodeId, ObjectPath, ReportSink,
};
use glove_joystick::hid::JOYSTICK_REPORT_SIZE;
use heapless::Vec;
use nrf_softdevice::ble::gatt_server::{self, WriteOp};
use nrf_softdevice::ble::{peripheral, Connection};
use nrf_softdevice::{raw, Softdevice};

use super::host::Registered;
use super::security::PairingHandler;

/// One queued input report, addressed by attribute handle.
pub struct Notification {
    pub handle: u16,
    pub value: Vec<u8, JOYSTICK_REPORT_SIZE>,
}

/// Queues value changes for the connection task.
///
/// Never blocks: when the queue is full the report is dropped.
pub struct ChannelSink<'a> {
    app: &'a GattApplication,
    table: &'a AttributeTable,
    tx: Sender<'static, CriticalSectionRawMutex, Notification, REPORT_QUEUE_DEPTH>,
}

impl<'a> ChannelSink<'a> {
    pub fn new(
        app: &'a GattApplication,
        table: &'a AttributeTable,
        tx: Sender<'static, CriticalSectionRawMutex, Notification, REPORT_QUEUE_DEPTH>,
    ) -> Self {
        Self { app, table, tx }
    }
}

impl ReportSink for ChannelSink<'_> {
    fn value_changed(&self, path: &ObjectPath, value: &[u8]) {
        let Some(handle) = self
            .app
            .find(path.as_str())
            .ok()
            .and_then(|node| self.table.handle(node))
        else {
            warn!("no attribute handle for {}", path.as_str());
            return;
        };
        let Ok(value) = Vec::from_slice(value) else {
            warn!("report of {} bytes does not fit", value.len());
            return;
        };
        if self.tx.try_send(Notification { handle, value }).is_err() {
            warn!("report queue full, dropping report");
        }
    }
}

pub struct HidServer<'a> {
    app: &'a GattApplication,
    table: &'a AttributeTable,
}

impl<'a> HidServer<'a> {
    pub fn new(app: &'a GattApplication, table: &'a AttributeTable) -> Self {
        Self { app, table }
    }

    /// Forget the subscription of a central that went away.
    fn reset_subscription(&self) {
        let cccd = NodeId::Descriptor(self.app.input_report_cccd());
        if let Err(e) = self
            .app
            .write_value(cccd, Interface::GattDescriptor, &[0x00, 0x00])
        {
            warn!("clearing CCCD failed: {}", e);
        }
        if let Err(e) = self
            .app
            .stop_notify(self.app.input_report().into(), Interface::GattCharacteristic)
        {
            warn!("stop notify failed: {}", e);
        }
    }
}

impl gatt_server::Server for HidServer<'_> {
    type Event = NodeId;

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        offset: usize,
        data: &[u8],
    ) -> Option<Self::Event> {
        if offset != 0 {
            warn!("ignoring write at offset {} to handle {}", offset, handle);
            return None;
        }
        match self.table.dispatch_write(self.app, handle, data) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!("write to handle {} rejected: {}", handle, e);
                None
            }
        }
    }
}

fn request_conn_params(conn: &Connection) {
    let params = raw::ble_gap_conn_params_t {
        min_conn_interval: BLE_CONN_INTERVAL_MIN,
        max_conn_interval: BLE_CONN_INTERVAL_MAX,
        slave_latency: BLE_SLAVE_LATENCY,
        conn_sup_timeout: BLE_SUP_TIMEOUT,
    };
    if conn.set_conn_params(params).is_err() {
        warn!("connection parameter update refused");
    }
}

async fn serve(
    conn: &Connection,
    server: &HidServer<'_>,
    rx: &Receiver<'static, CriticalSectionRawMutex, Notification, REPORT_QUEUE_DEPTH>,
) {
    let gatt = gatt_server::run(conn, server, |node| {
        info!("{} written", server.app.path(node).as_str());
    });
    let notify = async {
        loop {
            let n = rx.receive().await;
            if gatt_server::notify_value(conn, n.handle, &n.value).is_err() {
                warn!("notify on handle {} failed", n.handle);
            }
        }
    };

    if let Either::First(_) = select(gatt, notify).await {
        info!("central disconnected");
    }
}

/// Advertise, serve one central until it leaves, repeat.
pub async fn connection_loop(
    sd: &'static Softdevice,
    server: &HidServer<'_>,
    registered: &Registered,
    security: &'static PairingHandler,
    rx: Receiver<'static, CriticalSectionRawMutex, Notification, REPORT_QUEUE_DEPTH>,
) -> ! {
    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &registered.adv_data,
            scan_data: registered.scan_data,
        };
        info!("advertising");
        match peripheral::advertise_pairable(sd, adv, &registered.advertising, security).await {
            Ok(conn) => {
                info!("connection established");
                request_conn_params(&conn);
                serve(&conn, server, &rx).await;
                server.reset_subscription();
                while rx.try_receive().is_ok() {}
            }
            Err(e) => {
                error!("Advertisement error: {:?}", e);
                Timer::after_secs(1).await;
            }
        }
    }
}
