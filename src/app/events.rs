//! Outbound diagnostic events.
//!
//! The [`IndicatorService`](super::service::IndicatorService) emits these
//! through the [`DiagnosticsSink`](super::ports::DiagnosticsSink) port.
//! Adapters on the other side decide what to do with them — log to
//! serial, notify a characteristic, etc.

use crate::diagnostics::SessionStats;
use crate::indicator::IndicatorState;

use super::ports::PeerId;

/// Structured events emitted by the session service.
#[derive(Debug, Clone)]
pub enum DiagEvent {
    /// A peer connected and a fresh session began (state reset to Dark).
    Connected { peer: PeerId },

    /// The peer disconnected; carries the closed session's counters.
    Disconnected { peer: PeerId, stats: SessionStats },

    /// The indicator transitioned between states.
    StateChanged {
        from: IndicatorState,
        to: IndicatorState,
    },

    /// A dwell timer ran out with no command arriving.
    DwellExpired {
        from: IndicatorState,
        elapsed_ms: u64,
    },
}
