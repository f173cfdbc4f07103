//! Discrete indicator LED driver.
//!
//! The board's three indicator LEDs are wired active-low: driving the
//! pin low sinks current through the LED. This wrapper keeps that
//! inversion in one place and tracks the logical level so redundant
//! writes can be skipped.
//!
//! Generic over [`embedded_hal::digital::OutputPin`], so it runs on any
//! HAL pin on target and on a plain mock in host tests.

use embedded_hal::digital::OutputPin;

/// One active-low LED.
pub struct IndicatorLed<P: OutputPin> {
    pin: P,
    lit: bool,
}

impl<P: OutputPin> IndicatorLed<P> {
    /// Wrap a pin and drive it to the off level.
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_high()?;
        Ok(Self { pin, lit: false })
    }

    /// Light or extinguish the LED. Idempotent.
    pub fn set_lit(&mut self, lit: bool) -> Result<(), P::Error> {
        if lit == self.lit {
            return Ok(());
        }
        if lit {
            self.pin.set_low()?;
        } else {
            self.pin.set_high()?;
        }
        self.lit = lit;
        Ok(())
    }

    /// Whether the LED is currently lit.
    pub fn is_lit(&self) -> bool {
        self.lit
    }
}
