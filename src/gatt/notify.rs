//! Notification subscription state.
//!
//! The `notifying` flag is the only thing the report emitter reads. It is
//! written from two places: CCCD writes and `StartNotify`/`StopNotify`.
//! Both go through [`NotifyFlag::set`]; the last writer wins.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use crate::error::Error;

/// CCCD bit 0: notifications enabled.
pub const CCCD_NOTIFY: u16 = 0x0001;
/// CCCD bit 1: indications enabled.
pub const CCCD_INDICATE: u16 = 0x0002;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Subscription {
    Unsubscribed,
    Subscribed,
}

impl From<bool> for Subscription {
    fn from(notifying: bool) -> Self {
        if notifying {
            Subscription::Subscribed
        } else {
            Subscription::Unsubscribed
        }
    }
}

/// Per-characteristic `notifying` flag.
#[derive(Debug)]
pub struct NotifyFlag(AtomicBool);

impl NotifyFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, notifying: bool) {
        self.0.store(notifying, Ordering::Release);
    }

    pub fn state(&self) -> Subscription {
        self.get().into()
    }
}

impl Default for NotifyFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Client Characteristic Configuration value (2-byte little-endian bitmask).
#[derive(Debug, Default)]
pub struct ClientConfig(AtomicU16);

impl ClientConfig {
    pub const fn new() -> Self {
        Self(AtomicU16::new(0))
    }

    pub fn get(&self) -> u16 {
        self.0.load(Ordering::Acquire)
    }

    pub fn to_bytes(&self) -> [u8; 2] {
        self.get().to_le_bytes()
    }

    /// Store a written value and return it.
    ///
    /// A one-byte write leaves the high byte zero; bytes past the second
    /// are ignored. An empty write is `InvalidArgument`.
    pub fn write(&self, data: &[u8]) -> Result<u16, Error> {
        let value = match data {
            [] => return Err(Error::InvalidArgument),
            [lo] => *lo as u16,
            [lo, hi, ..] => u16::from_le_bytes([*lo, *hi]),
        };
        self.0.store(value, Ordering::Release);
        Ok(value)
    }

    pub fn notifications_enabled(&self) -> bool {
        self.get() & CCCD_NOTIFY != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_defaults_unsubscribed() {
        let flag = NotifyFlag::new();
        assert!(!flag.get());
        assert_eq!(flag.state(), Subscription::Unsubscribed);
    }

    #[test]
    fn flag_last_writer_wins() {
        let flag = NotifyFlag::new();
        flag.set(true);
        flag.set(true);
        assert_eq!(flag.state(), Subscription::Subscribed);
        flag.set(false);
        assert_eq!(flag.state(), Subscription::Unsubscribed);
    }

    #[test]
    fn cccd_write_two_bytes() {
        let cccd = ClientConfig::new();
        assert_eq!(cccd.write(&[0x01, 0x00]), Ok(0x0001));
        assert!(cccd.notifications_enabled());
        assert_eq!(cccd.to_bytes(), [0x01, 0x00]);
        assert_eq!(cccd.write(&[0x02, 0x00]), Ok(CCCD_INDICATE));
        assert!(!cccd.notifications_enabled());
    }

    #[test]
    fn cccd_write_one_byte_zero_extends() {
        let cccd = ClientConfig::new();
        cccd.write(&[0xFF, 0xFF]).unwrap();
        assert_eq!(cccd.write(&[0x01]), Ok(0x0001));
        assert_eq!(cccd.to_bytes(), [0x01, 0x00]);
    }

    #[test]
    fn cccd_write_empty_rejected() {
        let cccd = ClientConfig::new();
        cccd.write(&[0x01, 0x00]).unwrap();
        assert_eq!(cccd.write(&[]), Err(Error::InvalidArgument));
        assert_eq!(cccd.get(), 0x0001);
    }

    #[test]
    fn cccd_write_ignores_trailing_bytes() {
        let cccd = ClientConfig::new();
        assert_eq!(cccd.write(&[0x01, 0x00, 0xAA]), Ok(0x0001));
    }
}
