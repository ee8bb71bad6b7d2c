//! glove-joystick firmware entry point (nRF52840 + SoftDevice S140).
//!
//! Startup: service tree, SoftDevice, registration, then two tasks. The
//! sampler reads the flex sensors every tick and queues reports; the main
//! task advertises and serves one central at a time.

#![no_std]
#![no_main]

mod ble;

use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::spim::{self, Spim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_time::{Duration, Ticker};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use glove_joystick::advertisement::Advertisement;
use glove_joystick::agent::NoInputNoOutputAgent;
use glove_joystick::config::{
    ADAPTER, ADVERTISEMENT_PATH, AGENT_PATH, APPLICATION_PATH, SAMPLE_PERIOD_MS,
    SENSOR_SPI_FREQ_HZ,
};
use glove_joystick::gatt::{AttributeTable, GattApplication};
use glove_joystick::registration::Registration;
use glove_joystick::sampler::{CancelToken, Pacer, Sampler};
use glove_joystick::sensors::FlexSensors;
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::ble::host::{Registered, SoftdeviceHost};
use crate::ble::server::{ChannelSink, HidServer};

bind_interrupts!(struct Irqs {
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
});

type SensorBus = ExclusiveDevice<Spim<'static, peripherals::SPI3>, Output<'static>, NoDelay>;

static APPLICATION: StaticCell<GattApplication> = StaticCell::new();
static AGENT: StaticCell<NoInputNoOutputAgent> = StaticCell::new();
static REGISTERED: StaticCell<Registered> = StaticCell::new();
static CANCEL: CancelToken = CancelToken::new();

struct TickerPacer(Ticker);

impl Pacer for TickerPacer {
    async fn tick(&mut self) {
        self.0.next().await
    }
}

fn spi_frequency(hz: u32) -> spim::Frequency {
    match hz {
        0..=125_000 => spim::Frequency::K125,
        ..=250_000 => spim::Frequency::K250,
        ..=500_000 => spim::Frequency::K500,
        ..=1_000_000 => spim::Frequency::M1,
        ..=2_000_000 => spim::Frequency::M2,
        ..=4_000_000 => spim::Frequency::M4,
        _ => spim::Frequency::M8,
    }
}

#[embassy_executor::task]
async fn sampler_task(
    app: &'static GattApplication,
    table: &'static AttributeTable,
    sensors: FlexSensors<SensorBus>,
) {
    let sink = ChannelSink::new(app, table, ble::REPORTS.sender());
    let mut sampler = Sampler::new(app, sensors, &sink);
    let mut pacer = TickerPacer(Ticker::every(Duration::from_millis(SAMPLE_PERIOD_MS)));
    let stats = sampler.run(&mut pacer, &CANCEL).await;
    info!("sampler finished: {}", stats);
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("glove-joystick starting");

    // SoftDevice reserves priorities 0, 1 and 4.
    let mut config = embassy_nrf::config::Config::default();
    config.gpiote_interrupt_priority = Priority::P2;
    config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(config);
    interrupt::SPIM3.set_priority(Priority::P3);

    // MCP3008: SCK P0.13, MISO P0.14, MOSI P0.15, CS P0.16
    let mut spi_config = spim::Config::default();
    spi_config.frequency = spi_frequency(SENSOR_SPI_FREQ_HZ);
    spi_config.mode = spim::MODE_0;
    let spim = Spim::new(p.SPI3, Irqs, p.P0_13, p.P0_14, p.P0_15, spi_config);
    let cs = Output::new(p.P0_16, Level::High, OutputDrive::Standard);
    let bus = ExclusiveDevice::new_no_delay(spim, cs).unwrap_or_else(|e| match e {});
    let sensors = FlexSensors::new(bus);

    let app: &'static GattApplication =
        APPLICATION.init(unwrap!(GattApplication::new(APPLICATION_PATH)));
    let agent: &'static NoInputNoOutputAgent =
        AGENT.init(unwrap!(NoInputNoOutputAgent::new(AGENT_PATH)));
    let advertisement = unwrap!(Advertisement::new(ADVERTISEMENT_PATH));

    let sd = ble::enable_softdevice();
    let mut host = SoftdeviceHost::new(&mut *sd);
    let registration = Registration {
        adapter: &ADAPTER,
        application: app,
        advertisement: &advertisement,
        agent,
    };
    if let Err(e) = registration.register(&mut host) {
        defmt::panic!("startup registration failed: {}", e);
    }
    let registered: &'static Registered = REGISTERED.init(host.finish());
    let sd: &'static Softdevice = sd;

    unwrap!(spawner.spawn(ble::softdevice_task(sd)));
    unwrap!(spawner.spawn(sampler_task(app, &registered.table, sensors)));

    let security = ble::security::pairing_handler(agent);
    let server = HidServer::new(app, &registered.table);
    ble::server::connection_loop(sd, &server, registered, security, ble::REPORTS.receiver())
        .await
}
