//! Indicator state machine core.
//!
//! The [`IndicatorController`] owns the current state and the activation
//! timestamp of each lit channel, and advances on every poll tick:
//!
//! ```text
//!            ┌─────0x01────▶ RED ────0x02───▶ BLUE ───0x03──▶ GREEN
//!          DARK               │5000ms          │4000ms          │3000ms
//!            ▲◀───────────────┘    ◀───────────┘    ◀───────────┘
//!            └───────────────────────0x00───────────────────────┘
//! ```
//!
//! Command bytes walk the ring forward; dwell timeouts step one state
//! back toward `Dark`. A pending command — matching or not — always
//! pre-empts timeout evaluation for that tick, so at most one transition
//! happens per tick and its cause is unambiguous.
//!
//! The controller is a pure function of (state, timestamps, input) apart
//! from the timestamp write; every input has a defined outcome, so no
//! method here can fail. All I/O lives behind the port traits in
//! [`crate::app::ports`].

pub mod rules;

use self::rules::{DwellRule, accepted_command, build_dwell_table};

use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Enumeration of all indicator states. Exactly one is active at any
/// instant; `Dark` is the initial and only stable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IndicatorState {
    Dark = 0,
    Red = 1,
    Blue = 2,
    Green = 3,
}

impl IndicatorState {
    /// Total number of states — used to size the dwell table.
    pub const COUNT: usize = 4;

    /// The output channel this state keeps asserted, if any.
    pub const fn channel(self) -> Option<Channel> {
        match self {
            Self::Dark => None,
            Self::Red => Some(Channel::Red),
            Self::Blue => Some(Channel::Blue),
            Self::Green => Some(Channel::Green),
        }
    }
}

/// Logical output channel id, decoupled from GPIO numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Blue = 1,
    Green = 2,
}

impl Channel {
    pub const COUNT: usize = 3;
    pub const ALL: [Channel; Channel::COUNT] = [Channel::Red, Channel::Blue, Channel::Green];
}

// ---------------------------------------------------------------------------
// Tick outputs
// ---------------------------------------------------------------------------

/// Requested output levels after a transition: assert exactly one
/// channel, or none for `Dark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveEffect {
    pub asserted: Option<Channel>,
}

impl DriveEffect {
    pub const ALL_OFF: DriveEffect = DriveEffect { asserted: None };

    /// Per-channel levels, in [`Channel::ALL`] order.
    pub fn levels(self) -> [(Channel, bool); Channel::COUNT] {
        Channel::ALL.map(|ch| (ch, Some(ch) == self.asserted))
    }
}

/// A dwell timer ran out: `from` was active for `elapsed_ms` without a
/// command. Reported to the diagnostics sink by the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellExpiry {
    pub from: IndicatorState,
    pub elapsed_ms: u64,
}

/// Result of one controller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// State after the tick.
    pub state: IndicatorState,
    /// Output change to apply; `None` when no transition happened.
    pub drive: Option<DriveEffect>,
    /// Set when the transition was caused by a dwell timeout.
    pub expiry: Option<DwellExpiry>,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// The indicator state machine.
///
/// Owns the current state, one activation timestamp per lit state, and
/// the dwell table derived from configuration.
pub struct IndicatorController {
    state: IndicatorState,
    /// Millisecond timestamp at which each lit state was last entered,
    /// indexed by its channel. Stale entries are harmless: a state's
    /// slot is re-stamped on every entry, and only the current state's
    /// slot is ever consulted.
    entered_at_ms: [u64; Channel::COUNT],
    dwell: [Option<DwellRule>; IndicatorState::COUNT],
}

impl IndicatorController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: IndicatorState::Dark,
            entered_at_ms: [0; Channel::COUNT],
            dwell: build_dwell_table(config),
        }
    }

    /// Reset to `Dark` with all outputs off.
    ///
    /// Idempotent; called at the start of every peer session. Activation
    /// timestamps are left as-is — they are re-stamped on entry before
    /// ever being read.
    pub fn initialize(&mut self) -> DriveEffect {
        self.state = IndicatorState::Dark;
        DriveEffect::ALL_OFF
    }

    /// Current state.
    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Advance by one poll tick.
    ///
    /// `command` is the pending peer byte, if any. A pending command is
    /// always consumed and pre-empts timeout evaluation; with no command
    /// the current state's dwell timer is checked instead.
    pub fn on_tick(&mut self, now_ms: u64, command: Option<u8>) -> TickOutcome {
        if let Some(byte) = command {
            let (wanted, next) = accepted_command(self.state);
            if byte == wanted {
                return self.enter(next, now_ms);
            }
            // Unrecognized or out-of-order byte: consumed, no effect.
            return self.unchanged();
        }

        if let Some(rule) = self.dwell[self.state as usize] {
            // Only lit states carry a dwell rule, so channel() is Some.
            let slot = self.state.channel().map_or(0, |ch| ch as usize);
            let elapsed = now_ms.saturating_sub(self.entered_at_ms[slot]);
            if elapsed >= rule.dwell_ms {
                let from = self.state;
                let mut outcome = self.enter(rule.successor, now_ms);
                outcome.expiry = Some(DwellExpiry {
                    from,
                    elapsed_ms: elapsed,
                });
                return outcome;
            }
        }

        self.unchanged()
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn enter(&mut self, next: IndicatorState, now_ms: u64) -> TickOutcome {
        if let Some(ch) = next.channel() {
            self.entered_at_ms[ch as usize] = now_ms;
        }
        self.state = next;
        TickOutcome {
            state: next,
            drive: Some(DriveEffect {
                asserted: next.channel(),
            }),
            expiry: None,
        }
    }

    fn unchanged(&self) -> TickOutcome {
        TickOutcome {
            state: self.state,
            drive: None,
            expiry: None,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_tick() -> impl Strategy<Value = (u64, Option<u8>)> {
        (0u64..100_000, proptest::option::of(any::<u8>()))
    }

    proptest! {
        #[test]
        fn reported_tick_state_matches_controller_state(ticks in proptest::collection::vec(arb_tick(), 1..200)) {
            let mut c = IndicatorController::new(&SystemConfig::default());
            let _ = c.initialize();
            let mut now = 0u64;
            for (delta, cmd) in ticks {
                now += delta;
                let out = c.on_tick(now, cmd);
                prop_assert_eq!(out.state, c.state());
                // Expiry elapsed can never undercut the dwell that fired.
                if let Some(expiry) = out.expiry {
                    prop_assert!(expiry.elapsed_ms >= 3000);
                }
            }
        }

        #[test]
        fn bytes_above_0x03_never_transition(byte in 0x04u8..=0xFF, now in 0u64..10_000) {
            let mut c = IndicatorController::new(&SystemConfig::default());
            let _ = c.initialize();
            let out = c.on_tick(now, Some(byte));
            prop_assert_eq!(out.state, IndicatorState::Dark);
            prop_assert!(out.drive.is_none());
        }
    }
}
