//! Unified error type for glove-joystick.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (behind the `defmt` feature) for efficient
//! on-target logging.

/// Top-level error type used across the library and firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // GATT protocol
    /// The operation was invoked through an interface the node does not
    /// implement.
    InvalidInterface,

    /// Write payload is malformed (e.g. an empty buffer).
    InvalidArgument,

    /// Read offset lies past the end of the attribute value.
    InvalidOffset,

    /// The node does not support the requested operation
    /// (e.g. reading a write-only characteristic).
    NotSupported,

    /// No node is registered under the requested object path.
    UnknownObject,

    // HID
    /// The static report descriptor does not describe the report the
    /// encoder produces.
    DescriptorMismatch,

    // Sensors
    /// Sampling the flex sensors failed.
    Sensor(SensorError),

    // Startup
    /// The BLE host rejected one of the startup registrations.
    Registration(RegistrationStage),

    // Generic
    /// Buffer too small for the requested operation.
    BufferOverflow,
}

/// Transient failures of the sampling collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// The SPI transaction with the ADC failed.
    Bus,
    /// ADC channel outside 0..=7.
    InvalidChannel(u8),
}

/// Which startup registration the host refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStage {
    /// Adapter settings (discoverable, alias, timeout).
    Adapter,
    /// GATT application (service tree).
    Application,
    /// LE advertisement.
    Advertisement,
    /// Pairing agent.
    Agent,
}

// Convenience conversions

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Error::Sensor(e)
    }
}

impl From<RegistrationStage> for Error {
    fn from(stage: RegistrationStage) -> Self {
        Error::Registration(stage)
    }
}
