//! Session service — the hexagonal core.
//!
//! [`IndicatorService`] owns the indicator controller and the session
//! counters. It exposes a clean, hardware-agnostic API: all I/O flows
//! through port traits injected at call sites, making the whole service
//! testable with mock adapters.
//!
//! ```text
//!  TransportPort ──▶ ┌──────────────────────┐ ──▶ DiagnosticsSink
//!      ClockPort ──▶ │   IndicatorService    │
//!     OutputPort ◀── │  IndicatorController  │
//!                    └──────────────────────┘
//! ```

use log::info;

use crate::config::SystemConfig;
use crate::diagnostics::SessionStats;
use crate::indicator::{DriveEffect, IndicatorController, IndicatorState};

use super::events::DiagEvent;
use super::ports::{ClockPort, DiagnosticsSink, OutputPort, PeerId, TransportPort};

/// Orchestrates one peer session over the indicator controller.
pub struct IndicatorService {
    controller: IndicatorController,
    stats: SessionStats,
}

impl IndicatorService {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            controller: IndicatorController::new(config),
            stats: SessionStats::new(),
        }
    }

    // ── Session lifecycle ─────────────────────────────────────

    /// Begin a fresh session: reset the controller to Dark, drive all
    /// outputs off, zero the counters, and announce the peer.
    pub fn begin_session(
        &mut self,
        peer: PeerId,
        outputs: &mut impl OutputPort,
        sink: &mut impl DiagnosticsSink,
    ) {
        let effect = self.controller.initialize();
        Self::apply(outputs, effect);
        self.stats = SessionStats::new();
        info!("Session start: peer {}", peer.as_str());
        sink.record(&DiagEvent::Connected { peer });
    }

    /// Close the session: extinguish the outputs and report the counters.
    pub fn end_session(
        &mut self,
        peer: PeerId,
        outputs: &mut impl OutputPort,
        sink: &mut impl DiagnosticsSink,
    ) {
        let effect = self.controller.initialize();
        Self::apply(outputs, effect);
        info!(
            "Session end: peer {} ({} ticks, {} cmds, {} timeouts)",
            peer.as_str(),
            self.stats.ticks,
            self.stats.commands_total(),
            self.stats.dwell_timeouts,
        );
        sink.record(&DiagEvent::Disconnected {
            peer,
            stats: self.stats,
        });
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one poll cycle: probe for a command, read the clock, advance
    /// the controller, apply any drive change, surface diagnostics.
    pub fn tick(
        &mut self,
        transport: &mut impl TransportPort,
        clock: &impl ClockPort,
        outputs: &mut impl OutputPort,
        sink: &mut impl DiagnosticsSink,
    ) -> IndicatorState {
        self.stats.ticks += 1;

        let now = clock.now_ms();
        let command = transport.poll_command();
        let prev = self.controller.state();

        let outcome = self.controller.on_tick(now, command);

        if command.is_some() {
            if outcome.state == prev {
                self.stats.commands_ignored += 1;
            } else {
                self.stats.commands_accepted += 1;
            }
        }

        if let Some(expiry) = outcome.expiry {
            self.stats.dwell_timeouts += 1;
            sink.record(&DiagEvent::DwellExpired {
                from: expiry.from,
                elapsed_ms: expiry.elapsed_ms,
            });
        }

        if let Some(effect) = outcome.drive {
            Self::apply(outputs, effect);
            sink.record(&DiagEvent::StateChanged {
                from: prev,
                to: outcome.state,
            });
        }

        outcome.state
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current indicator state.
    pub fn state(&self) -> IndicatorState {
        self.controller.state()
    }

    /// Counters for the session in progress.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    // ── Internal ──────────────────────────────────────────────

    /// Translate a drive effect into per-channel port calls.
    fn apply(outputs: &mut impl OutputPort, effect: DriveEffect) {
        if effect.asserted.is_none() {
            outputs.all_off();
            return;
        }
        for (channel, asserted) in effect.levels() {
            outputs.set_channel(channel, asserted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::Channel;
    use crate::indicator::rules::{CMD_BLUE, CMD_RED};

    struct FakeClock(u64);
    impl ClockPort for FakeClock {
        fn now_ms(&self) -> u64 {
            self.0
        }
    }

    #[derive(Default)]
    struct FakeTransport {
        pending: Option<u8>,
    }
    impl TransportPort for FakeTransport {
        fn is_peer_connected(&self) -> bool {
            true
        }
        fn peer_identifier(&self) -> PeerId {
            PeerId::new()
        }
        fn poll_command(&mut self) -> Option<u8> {
            self.pending.take()
        }
    }

    #[derive(Default)]
    struct FakeOutputs {
        levels: [bool; Channel::COUNT],
    }
    impl OutputPort for FakeOutputs {
        fn set_channel(&mut self, channel: Channel, asserted: bool) {
            self.levels[channel as usize] = asserted;
        }
        fn all_off(&mut self) {
            self.levels = [false; Channel::COUNT];
        }
    }

    #[derive(Default)]
    struct FakeSink {
        events: Vec<DiagEvent>,
    }
    impl DiagnosticsSink for FakeSink {
        fn record(&mut self, event: &DiagEvent) {
            self.events.push(event.clone());
        }
    }

    fn make_service() -> (IndicatorService, FakeTransport, FakeOutputs, FakeSink) {
        let mut svc = IndicatorService::new(&SystemConfig::default());
        let transport = FakeTransport::default();
        let mut outputs = FakeOutputs::default();
        let mut sink = FakeSink::default();
        svc.begin_session(PeerId::new(), &mut outputs, &mut sink);
        (svc, transport, outputs, sink)
    }

    #[test]
    fn accepted_command_drives_exactly_one_channel() {
        let (mut svc, mut transport, mut outputs, mut sink) = make_service();
        transport.pending = Some(CMD_RED);
        let state = svc.tick(&mut transport, &FakeClock(0), &mut outputs, &mut sink);
        assert_eq!(state, IndicatorState::Red);
        assert_eq!(outputs.levels, [true, false, false]);
        assert_eq!(svc.stats().commands_accepted, 1);
    }

    #[test]
    fn ignored_command_leaves_outputs_untouched() {
        let (mut svc, mut transport, mut outputs, mut sink) = make_service();
        transport.pending = Some(0x7F);
        let state = svc.tick(&mut transport, &FakeClock(0), &mut outputs, &mut sink);
        assert_eq!(state, IndicatorState::Dark);
        assert_eq!(outputs.levels, [false, false, false]);
        assert_eq!(svc.stats().commands_ignored, 1);
        assert!(
            !sink
                .events
                .iter()
                .any(|e| matches!(e, DiagEvent::StateChanged { .. }))
        );
    }

    #[test]
    fn dwell_expiry_reaches_the_sink() {
        let (mut svc, mut transport, mut outputs, mut sink) = make_service();
        transport.pending = Some(CMD_RED);
        let _ = svc.tick(&mut transport, &FakeClock(100), &mut outputs, &mut sink);

        let state = svc.tick(&mut transport, &FakeClock(5100), &mut outputs, &mut sink);
        assert_eq!(state, IndicatorState::Dark);
        assert_eq!(outputs.levels, [false, false, false]);
        assert_eq!(svc.stats().dwell_timeouts, 1);
        assert!(sink.events.iter().any(|e| matches!(
            e,
            DiagEvent::DwellExpired {
                from: IndicatorState::Red,
                elapsed_ms: 5000,
            }
        )));
    }

    #[test]
    fn switching_channels_deasserts_the_previous_one() {
        let (mut svc, mut transport, mut outputs, mut sink) = make_service();
        transport.pending = Some(CMD_RED);
        let _ = svc.tick(&mut transport, &FakeClock(0), &mut outputs, &mut sink);
        transport.pending = Some(CMD_BLUE);
        let _ = svc.tick(&mut transport, &FakeClock(10), &mut outputs, &mut sink);
        assert_eq!(outputs.levels, [false, true, false]);
    }

    #[test]
    fn begin_session_resets_state_and_counters() {
        let (mut svc, mut transport, mut outputs, mut sink) = make_service();
        transport.pending = Some(CMD_RED);
        let _ = svc.tick(&mut transport, &FakeClock(0), &mut outputs, &mut sink);
        assert_eq!(svc.state(), IndicatorState::Red);

        svc.begin_session(PeerId::new(), &mut outputs, &mut sink);
        assert_eq!(svc.state(), IndicatorState::Dark);
        assert_eq!(outputs.levels, [false, false, false]);
        assert_eq!(svc.stats(), SessionStats::new());
    }

    #[test]
    fn end_session_reports_stats() {
        let (mut svc, mut transport, mut outputs, mut sink) = make_service();
        transport.pending = Some(CMD_RED);
        let _ = svc.tick(&mut transport, &FakeClock(0), &mut outputs, &mut sink);

        svc.end_session(PeerId::new(), &mut outputs, &mut sink);
        assert_eq!(outputs.levels, [false, false, false]);
        let reported = sink.events.iter().find_map(|e| match e {
            DiagEvent::Disconnected { stats, .. } => Some(*stats),
            _ => None,
        });
        assert_eq!(reported.unwrap().commands_accepted, 1);
    }
}
