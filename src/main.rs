//! LedSwitch Firmware — Main Entry Point
//!
//! Hexagonal architecture with a polled session loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  BleAdapter       LedBankAdapter   MonotonicClock        │
//! │  (TransportPort)  (OutputPort)     (ClockPort)           │
//! │  LogDiagnostics                                          │
//! │  (DiagnosticsSink)                                       │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────      │
//! │                                                          │
//! │  ┌──────────────────────────────────────────────────┐    │
//! │  │        IndicatorService (pure logic)             │    │
//! │  │        IndicatorController FSM                   │    │
//! │  └──────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop advertises, waits for a central, then polls once per
//! `poll_interval_ms` while the session lasts: one clock read, one
//! command probe, at most one state transition. On disconnect the
//! indicator resets and advertising resumes for the next peer.
#![deny(unused_must_use)]

// ── Module declarations ───────────────────────────────────────
pub mod config;
mod diagnostics;
mod error;
mod pins;

pub mod app;
pub mod indicator;
mod adapters;
mod drivers;

// ── Imports ───────────────────────────────────────────────────
use anyhow::{Context, Result};
use log::info;

use adapters::ble::BleAdapter;
use adapters::hardware::LedBankAdapter;
use adapters::log_sink::LogDiagnostics;
use adapters::time::MonotonicClock;
use app::ports::TransportPort;
use app::service::IndicatorService;
use config::SystemConfig;
use drivers::indicator_led::IndicatorLed;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("LedSwitch v{}", env!("CARGO_PKG_VERSION"));

    let config = SystemConfig::default();

    // ── 2. Indicator LED bank ─────────────────────────────────
    let mut outputs = init_led_bank().context("LED bank init failed")?;

    // ── 3. BLE transport ──────────────────────────────────────
    // No transport means nothing to control: halt here and let the
    // watchdog reset us rather than run dark.
    let mut ble = BleAdapter::new(config.device_name.clone());
    if let Err(e) = ble.start() {
        log::error!("BLE start failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 4. Service + remaining adapters ───────────────────────
    let clock = MonotonicClock::new();
    let mut sink = LogDiagnostics::new();
    let mut service = IndicatorService::new(&config);

    info!("System ready. Waiting for a central.");

    // ── 5. Session loop ───────────────────────────────────────
    let poll = std::time::Duration::from_millis(config.poll_interval_ms as u64);

    loop {
        if !ble.is_peer_connected() {
            std::thread::sleep(poll);
            continue;
        }

        let peer = ble.peer_identifier();
        service.begin_session(peer.clone(), &mut outputs, &mut sink);

        while ble.is_peer_connected() {
            let _ = service.tick(&mut ble, &clock, &mut outputs, &mut sink);
            std::thread::sleep(poll);
        }

        service.end_session(peer, &mut outputs, &mut sink);
    }
}

// ── Hardware construction ─────────────────────────────────────

#[cfg(target_os = "espidf")]
type LedBank = LedBankAdapter<
    esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::AnyOutputPin, esp_idf_hal::gpio::Output>,
    esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::AnyOutputPin, esp_idf_hal::gpio::Output>,
    esp_idf_hal::gpio::PinDriver<'static, esp_idf_hal::gpio::AnyOutputPin, esp_idf_hal::gpio::Output>,
>;

#[cfg(target_os = "espidf")]
fn init_led_bank() -> Result<LedBank> {
    use esp_idf_hal::gpio::{AnyOutputPin, PinDriver};

    // The indicator pins are dedicated to this driver for the whole
    // process lifetime.
    let red_pin = unsafe { AnyOutputPin::new(pins::LED_RED_GPIO) };
    let blue_pin = unsafe { AnyOutputPin::new(pins::LED_BLUE_GPIO) };
    let green_pin = unsafe { AnyOutputPin::new(pins::LED_GREEN_GPIO) };

    Ok(LedBankAdapter::new(
        IndicatorLed::new(PinDriver::output(red_pin)?).context("red LED")?,
        IndicatorLed::new(PinDriver::output(blue_pin)?).context("blue LED")?,
        IndicatorLed::new(PinDriver::output(green_pin)?).context("green LED")?,
    ))
}

/// Host-side simulation pin: levels go nowhere, the log tells the story.
#[cfg(not(target_os = "espidf"))]
struct SimPin;

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::OutputPin for SimPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
fn init_led_bank() -> Result<LedBankAdapter<SimPin, SimPin, SimPin>> {
    Ok(LedBankAdapter::new(
        IndicatorLed::new(SimPin).unwrap(),
        IndicatorLed::new(SimPin).unwrap(),
        IndicatorLed::new(SimPin).unwrap(),
    ))
}
