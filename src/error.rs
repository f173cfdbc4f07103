//! Unified error types for the LedSwitch firmware.
//!
//! The indicator core itself never fails — every input has a defined
//! outcome — so errors only exist at the platform boundary: bringing up
//! the BLE stack and the GPIO peripherals. A single `Copy` enum keeps
//! the boot path's error handling uniform.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Bluetooth controller or Bluedroid stack failed to start.
    BleInitFailed,
    /// GATT service registration failed.
    GattRegisterFailed,
    /// Advertising could not be started.
    AdvertisingFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BleInitFailed => write!(f, "BLE init failed"),
            Self::GattRegisterFailed => write!(f, "GATT registration failed"),
            Self::AdvertisingFailed => write!(f, "advertising failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
