//! Log-based diagnostics sink adapter.
//!
//! Implements [`DiagnosticsSink`] by writing structured events to the
//! `log` facade (UART / USB-CDC in production). Fire-and-forget by
//! construction — `log` never blocks the caller.

use log::info;

use crate::app::events::DiagEvent;
use crate::app::ports::DiagnosticsSink;

/// Adapter that logs every [`DiagEvent`] to the serial console.
pub struct LogDiagnostics;

impl LogDiagnostics {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticsSink for LogDiagnostics {
    fn record(&mut self, event: &DiagEvent) {
        match event {
            DiagEvent::Connected { peer } => {
                info!("CONN  | central {}", peer.as_str());
            }
            DiagEvent::Disconnected { peer, stats } => {
                info!(
                    "CONN  | central {} gone | ticks={} cmds={}/{} timeouts={}",
                    peer.as_str(),
                    stats.ticks,
                    stats.commands_accepted,
                    stats.commands_total(),
                    stats.dwell_timeouts,
                );
            }
            DiagEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            DiagEvent::DwellExpired { from, elapsed_ms } => {
                info!("DWELL | {:?} timed out after {}ms", from, elapsed_ms);
            }
        }
    }
}
