//! Property-based tests over the indicator state machine.

use ledswitch::config::SystemConfig;
use ledswitch::indicator::rules::accepted_command;
use ledswitch::indicator::{IndicatorController, IndicatorState};
use proptest::prelude::*;

fn arb_tick() -> impl Strategy<Value = (u64, Option<u8>)> {
    (0u64..20_000, proptest::option::of(any::<u8>()))
}

fn fresh_controller() -> IndicatorController {
    let mut c = IndicatorController::new(&SystemConfig::default());
    let _ = c.initialize();
    c
}

proptest! {
    /// Whatever the peer writes and however the clock advances, the
    /// machine only ever occupies its four defined states and any drive
    /// effect matches the state it accompanies.
    #[test]
    fn arbitrary_sessions_stay_in_defined_states(
        ticks in proptest::collection::vec(arb_tick(), 1..300)
    ) {
        let mut c = fresh_controller();
        let mut now = 0u64;
        for (delta, cmd) in ticks {
            now += delta;
            let out = c.on_tick(now, cmd);
            prop_assert!(matches!(
                out.state,
                IndicatorState::Dark
                    | IndicatorState::Red
                    | IndicatorState::Blue
                    | IndicatorState::Green
            ));
            if let Some(drive) = out.drive {
                prop_assert_eq!(drive.asserted, out.state.channel());
            }
            if let Some(expiry) = out.expiry {
                prop_assert!(cmd.is_none(), "expiry only on command-free ticks");
                prop_assert_ne!(expiry.from, IndicatorState::Dark);
            }
        }
    }

    /// A byte other than the current state's accepted code never moves
    /// the machine, no matter the state or the clock.
    #[test]
    fn rejected_bytes_never_transition(
        setup in proptest::collection::vec(any::<u8>(), 0..8),
        byte in any::<u8>(),
        now in 0u64..100_000,
    ) {
        let mut c = fresh_controller();
        for cmd in setup {
            let _ = c.on_tick(0, Some(cmd));
        }
        let state = c.state();
        let (wanted, _) = accepted_command(state);
        prop_assume!(byte != wanted);

        let out = c.on_tick(now, Some(byte));
        prop_assert_eq!(out.state, state);
        prop_assert!(out.drive.is_none());
        prop_assert!(out.expiry.is_none());
    }

    /// With a command pending, dwell timers are never evaluated — even
    /// arbitrarily far past their boundary.
    #[test]
    fn pending_command_always_suppresses_timeout(
        byte in any::<u8>(),
        overshoot in 0u64..1_000_000,
    ) {
        let mut c = fresh_controller();
        let _ = c.on_tick(0, Some(0x01)); // Dark → Red
        let out = c.on_tick(5000 + overshoot, Some(byte));
        prop_assert!(out.expiry.is_none());
    }

    /// Left alone, any lit state drains back to Dark through the dwell
    /// chain in bounded time (worst case Green: 3000 + 4000 + 5000 ms).
    #[test]
    fn idle_machine_always_reaches_dark(start_cmds in prop::sample::select(vec![
        vec![0x01u8],
        vec![0x01, 0x02],
        vec![0x01, 0x02, 0x03],
    ])) {
        let mut c = fresh_controller();
        for cmd in start_cmds {
            let _ = c.on_tick(0, Some(cmd));
        }
        let mut now = 0u64;
        while c.state() != IndicatorState::Dark {
            now += 100;
            prop_assert!(now <= 12_100, "chain must drain within 12s");
            let _ = c.on_tick(now, None);
        }
    }
}
