//! Port traits — the hexagonal boundary between the indicator core and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ IndicatorService (domain)
//! ```
//!
//! Driven adapters (BLE transport, LED bank, clock, diagnostics) implement
//! these traits. The [`IndicatorService`](super::service::IndicatorService)
//! consumes them via generics, so the domain core never touches hardware
//! or the wireless stack directly.

use crate::indicator::Channel;

use super::events::DiagEvent;

/// Peer identifier as reported by the transport (BLE address string).
pub type PeerId = heapless::String<20>;

// ───────────────────────────────────────────────────────────────
// Transport port (driven adapter: wireless stack → domain)
// ───────────────────────────────────────────────────────────────

/// Command-byte transport. One peer at a time; the session loop polls.
pub trait TransportPort {
    /// Whether a peer is currently connected.
    fn is_peer_connected(&self) -> bool;

    /// Address of the connected peer, for diagnostics. Empty when no
    /// peer is connected.
    fn peer_identifier(&self) -> PeerId;

    /// Non-blocking read of a pending command byte. Each written byte
    /// is delivered exactly once.
    fn poll_command(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → LED hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the indicator outputs.
///
/// Implementations must be idempotent and immediate: asserting an
/// already-lit channel is a no-op, and calls take effect before they
/// return.
pub trait OutputPort {
    /// Drive one logical channel on or off.
    fn set_channel(&mut self, channel: Channel, asserted: bool);

    /// De-assert all three channels.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic, non-decreasing millisecond clock.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Diagnostics sink (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`DiagEvent`]s through this port.
/// Fire-and-forget: implementations must never block the session loop,
/// and failures are swallowed.
pub trait DiagnosticsSink {
    fn record(&mut self, event: &DiagEvent);
}
