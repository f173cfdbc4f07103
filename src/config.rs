//! System configuration parameters
//!
//! All tunable parameters for the LedSwitch indicator. Defaults encode
//! the board's dwell policy; a future provisioning characteristic could
//! override them at runtime, hence the serde derives. Nothing here is
//! persisted — the device is stateless across power cycles.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Dwell policy ---
    /// How long Red stays lit without a command before falling to Dark (ms)
    pub red_dwell_ms: u32,
    /// How long Blue stays lit without a command before falling to Red (ms)
    pub blue_dwell_ms: u32,
    /// How long Green stays lit without a command before falling to Blue (ms)
    pub green_dwell_ms: u32,

    // --- Session loop ---
    /// Poll interval of the session loop (milliseconds)
    pub poll_interval_ms: u32,

    // --- BLE ---
    /// Advertised local name
    pub device_name: heapless::String<24>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut device_name = heapless::String::new();
        // 10 bytes into a 24-byte buffer cannot fail.
        let _ = device_name.push_str("LED_SWITCH");
        Self {
            red_dwell_ms: 5000,
            blue_dwell_ms: 4000,
            green_dwell_ms: 3000,
            poll_interval_ms: 10,
            device_name,
        }
    }
}
