//! Driven adapters: concrete implementations of the port traits in
//! [`crate::app::ports`].
//!
//! | Adapter            | Port              | Backed by                   |
//! |--------------------|-------------------|-----------------------------|
//! | [`ble`]            | `TransportPort`   | Bluedroid GATT / simulation |
//! | [`hardware`]       | `OutputPort`      | discrete LED pins           |
//! | [`time`]           | `ClockPort`       | esp_timer / `Instant`       |
//! | [`log_sink`]       | `DiagnosticsSink` | `log` facade                |

pub mod ble;
pub mod hardware;
pub mod log_sink;
pub mod time;
