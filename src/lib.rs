//! Host-testable core of glove-joystick.
//!
//! Everything that does not touch the radio or the SPI peripheral lives
//! here: the HID report and descriptor, the GATT service tree with its
//! notify state, the advertisement payload, the pairing agent, startup
//! registration and the sampling loop.
//!
//! Usage: `cargo test` (host) or
//! `cargo run --release --features embedded --target thumbv7em-none-eabihf`.
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main].
//! This library is `no_std` as well, except under `cfg(test)`.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
#[macro_use]
mod fmt;

pub mod advertisement;
pub mod agent;
pub mod config;
pub mod error;
pub mod gatt;
pub mod hid;
pub mod registration;
pub mod sampler;
pub mod sensors;

pub use error::{Error, RegistrationStage, SensorError};
pub use gatt::{GattApplication, ReportSink};
pub use hid::JoystickReport;
