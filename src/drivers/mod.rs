//! Low-level peripheral drivers.

pub mod indicator_led;
