//! Flex sensors read through an MCP3008 10-bit ADC over SPI.
//!
//! Channels 0-4 carry the five sensors. Raw readings are mapped linearly
//! from `FLEX_RAW_MIN..=FLEX_RAW_MAX` onto the signed 16-bit axis domain.

use embedded_hal_async::spi::SpiDevice;

use crate::config::{AXIS_COUNT, FLEX_RAW_MAX, FLEX_RAW_MIN};
use crate::error::SensorError;
use crate::hid::joystick::clamp_axis;

/// Highest MCP3008 channel.
pub const MCP3008_MAX_CHANNEL: u8 = 7;

/// Source of one sample of the five axes.
#[allow(async_fn_in_trait)]
pub trait AxisSource {
    async fn read_axes(&mut self) -> Result<[i16; AXIS_COUNT], SensorError>;
}

/// Single-ended conversion request for `channel`: start bit, then
/// single-ended mode and channel in the high nibble.
pub const fn mcp3008_command(channel: u8) -> [u8; 3] {
    [0x01, (8 + channel) << 4, 0x00]
}

/// 10-bit result from the last two bytes of the transfer.
pub const fn mcp3008_decode(rx: &[u8; 3]) -> u16 {
    (((rx[1] & 0x03) as u16) << 8) | rx[2] as u16
}

/// Map a raw reading onto [-32768, 32767], truncating toward zero.
pub fn scale_flex(raw: u16) -> i16 {
    let span = (FLEX_RAW_MAX - FLEX_RAW_MIN) as i32;
    let numerator = (raw as i32 - FLEX_RAW_MIN as i32) * 65_535 - 32_768 * span;
    clamp_axis(numerator / span)
}

pub struct Mcp3008<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Mcp3008<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Raw 0..=1023 reading of `channel`.
    pub async fn read_channel(&mut self, channel: u8) -> Result<u16, SensorError> {
        if channel > MCP3008_MAX_CHANNEL {
            return Err(SensorError::InvalidChannel(channel));
        }
        let mut buf = mcp3008_command(channel);
        self.spi
            .transfer_in_place(&mut buf)
            .await
            .map_err(|_| SensorError::Bus)?;
        Ok(mcp3008_decode(&buf))
    }

    pub fn release(self) -> SPI {
        self.spi
    }
}

/// The five glove flex sensors on channels 0-4.
pub struct FlexSensors<SPI> {
    adc: Mcp3008<SPI>,
}

impl<SPI: SpiDevice> FlexSensors<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self {
            adc: Mcp3008::new(spi),
        }
    }

    pub fn release(self) -> SPI {
        self.adc.release()
    }
}

impl<SPI: SpiDevice> AxisSource for FlexSensors<SPI> {
    async fn read_axes(&mut self) -> Result<[i16; AXIS_COUNT], SensorError> {
        let mut axes = [0i16; AXIS_COUNT];
        for (channel, axis) in axes.iter_mut().enumerate() {
            let raw = self.adc.read_channel(channel as u8).await?;
            *axis = scale_flex(raw);
        }
        Ok(axes)
    }
}
