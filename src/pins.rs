//! GPIO pin assignments for the LedSwitch board.
//!
//! The three indicator LEDs are discrete, active-low (driving the pin
//! low lights the LED), matching the on-module RGB LED wiring of the
//! reference hardware.

/// Red indicator LED (active-low).
pub const LED_RED_GPIO: i32 = 22;
/// Green indicator LED (active-low).
pub const LED_GREEN_GPIO: i32 = 23;
/// Blue indicator LED (active-low).
pub const LED_BLUE_GPIO: i32 = 24;
