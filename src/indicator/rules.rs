//! Transition tables for the indicator state machine.
//!
//! Two small tables drive everything:
//!
//! ```text
//!  command ring                     dwell chain
//!  Dark  ──0x01──▶ Red             Red   ──5000ms──▶ Dark
//!  Red   ──0x02──▶ Blue            Blue  ──4000ms──▶ Red
//!  Blue  ──0x03──▶ Green           Green ──3000ms──▶ Blue
//!  Green ──0x00──▶ Dark            Dark: no dwell (stable)
//! ```
//!
//! Every (state, byte) pair has a defined outcome: the accepted row
//! transitions, anything else is consumed with no effect.

use super::IndicatorState;
use crate::config::SystemConfig;

// ───────────────────────────────────────────────────────────────
// Command codes (single-byte GATT writes from the peer)
// ───────────────────────────────────────────────────────────────

/// Extinguish all channels.
pub const CMD_OFF: u8 = 0x00;
/// Select the red channel.
pub const CMD_RED: u8 = 0x01;
/// Select the blue channel.
pub const CMD_BLUE: u8 = 0x02;
/// Select the green channel.
pub const CMD_GREEN: u8 = 0x03;

/// The byte the current state accepts and the state it leads to.
///
/// Total over all states — each state has exactly one accepted command.
pub const fn accepted_command(state: IndicatorState) -> (u8, IndicatorState) {
    match state {
        IndicatorState::Dark => (CMD_RED, IndicatorState::Red),
        IndicatorState::Red => (CMD_BLUE, IndicatorState::Blue),
        IndicatorState::Blue => (CMD_GREEN, IndicatorState::Green),
        IndicatorState::Green => (CMD_OFF, IndicatorState::Dark),
    }
}

// ───────────────────────────────────────────────────────────────
// Dwell policy
// ───────────────────────────────────────────────────────────────

/// How long a state may remain active without a command, and where it
/// goes when that runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DwellRule {
    pub dwell_ms: u64,
    pub successor: IndicatorState,
}

/// Dwell rules for the three lit states, built from configuration.
/// `Dark` carries no rule — it exits only on an explicit command.
pub fn build_dwell_table(config: &SystemConfig) -> [Option<DwellRule>; IndicatorState::COUNT] {
    let mut table = [None; IndicatorState::COUNT];
    table[IndicatorState::Red as usize] = Some(DwellRule {
        dwell_ms: config.red_dwell_ms as u64,
        successor: IndicatorState::Dark,
    });
    table[IndicatorState::Blue as usize] = Some(DwellRule {
        dwell_ms: config.blue_dwell_ms as u64,
        successor: IndicatorState::Red,
    });
    table[IndicatorState::Green as usize] = Some(DwellRule {
        dwell_ms: config.green_dwell_ms as u64,
        successor: IndicatorState::Blue,
    });
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_ring_is_cyclic() {
        let mut state = IndicatorState::Dark;
        for _ in 0..4 {
            let (_, next) = accepted_command(state);
            state = next;
        }
        assert_eq!(state, IndicatorState::Dark, "four commands close the ring");
    }

    #[test]
    fn dwell_chain_steps_back_toward_dark() {
        let table = build_dwell_table(&SystemConfig::default());
        assert_eq!(
            table[IndicatorState::Red as usize].unwrap().successor,
            IndicatorState::Dark
        );
        assert_eq!(
            table[IndicatorState::Blue as usize].unwrap().successor,
            IndicatorState::Red
        );
        assert_eq!(
            table[IndicatorState::Green as usize].unwrap().successor,
            IndicatorState::Blue
        );
        assert!(table[IndicatorState::Dark as usize].is_none());
    }

    #[test]
    fn default_dwells_match_board_defaults() {
        let table = build_dwell_table(&SystemConfig::default());
        assert_eq!(table[IndicatorState::Red as usize].unwrap().dwell_ms, 5000);
        assert_eq!(table[IndicatorState::Blue as usize].unwrap().dwell_ms, 4000);
        assert_eq!(table[IndicatorState::Green as usize].unwrap().dwell_ms, 3000);
    }
}
