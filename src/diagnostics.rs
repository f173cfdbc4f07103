//! Per-session runtime diagnostics.
//!
//! Counters accumulated over one peer session and reported through the
//! diagnostics sink at disconnect. Structured data with no I/O of its
//! own.

/// Counters for a single peer session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Poll ticks executed while the peer was connected.
    pub ticks: u64,
    /// Command bytes that matched the current state's accepted code.
    pub commands_accepted: u32,
    /// Command bytes consumed with no effect.
    pub commands_ignored: u32,
    /// Dwell timers that expired.
    pub dwell_timeouts: u32,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total command bytes received from the peer.
    pub fn commands_total(&self) -> u32 {
        self.commands_accepted + self.commands_ignored
    }
}
