//! LedSwitch firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod indicator;

mod error;
pub use error::{CommsError, Error, Result};

pub mod pins;

// Platform adapters and drivers; espidf-only code is cfg-guarded inside.
pub mod adapters;
pub mod drivers;
