//! Application-wide constants and compile-time configuration.
//!
//! All naming, timing, calibration, and pin assignments live here so they
//! can be tuned in one place.

// Identity

/// Local name carried in the advertisement and used as the GAP device name.
pub const DEVICE_NAME: &str = "GloveJoystick";

/// GAP appearance: HID Joystick.
pub const APPEARANCE_HID_JOYSTICK: u16 = 0x03C3;

/// Advertising flags: LE General Discoverable (0x02) + BR/EDR Not Supported (0x04).
pub const ADV_FLAGS: u8 = 0x06;

// Object paths

/// Root of the GATT application; the service tree hangs below it.
pub const APPLICATION_PATH: &str = "/glove/hid";

/// Advertisement object.
pub const ADVERTISEMENT_PATH: &str = "/glove/advertisement0";

/// Pairing agent object.
pub const AGENT_PATH: &str = "/glove/agent";

// Adapter

/// Adapter settings applied before registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdapterConfig {
    /// Advertise as discoverable.
    pub discoverable: bool,
    /// Friendly name the adapter presents.
    pub alias: &'static str,
    /// Seconds until discoverable mode ends. 0 = never.
    pub discoverable_timeout_secs: u32,
}

pub const ADAPTER: AdapterConfig = AdapterConfig {
    discoverable: true,
    alias: DEVICE_NAME,
    discoverable_timeout_secs: 0,
};

/// GATT application registration options.
pub const REQUIRE_AUTHENTICATION: bool = false;
pub const REQUIRE_AUTHORIZATION: bool = false;

// Sampling

/// Sampling period (ms). 50 ms = 20 Hz.
pub const SAMPLE_PERIOD_MS: u64 = 50;

/// Raw ADC reading mapped to the axis minimum (-32768).
pub const FLEX_RAW_MIN: u16 = 200;

/// Raw ADC reading mapped to the axis maximum (32767).
pub const FLEX_RAW_MAX: u16 = 400;

/// Number of flex sensors / joystick axes.
pub const AXIS_COUNT: usize = 5;

/// Reports buffered between the sampling task and the connection task.
pub const REPORT_QUEUE_DEPTH: usize = 4;

// BLE

/// BLE connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms, 12 = 15 ms; well under the 50 ms report period.
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// ATT MTU requested from the SoftDevice.
pub const ATT_MTU: u16 = 64;

/// Size of the SoftDevice attribute table (bytes).
pub const GATTS_ATTR_TAB_SIZE: u32 = 1408;

/// Bonds kept in RAM (never persisted).
pub const MAX_BONDS: usize = 4;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; actual `embassy_nrf::peripherals::*` types are
// selected in `main.rs`.  Adjust for your custom PCB.
//
//   MCP3008 SCK   → P0.13
//   MCP3008 MISO  → P0.14
//   MCP3008 MOSI  → P0.15
//   MCP3008 CS    → P0.16

/// MCP3008 SPI clock. The part tops out at 1.35 MHz at 2.7 V.
pub const SENSOR_SPI_FREQ_HZ: u32 = 1_000_000;
