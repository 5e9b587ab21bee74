use crate::constants::{INSTRUCTIONS_PER_TICK, MAX_SAVED_STATES};

/// Knobs fixed when a `Machine` is built.
///
/// `instructions_per_tick` sets the emulated CPU speed; timers always run once per tick
/// regardless of it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub instructions_per_tick: usize,
    /// Number of past states kept for `Machine::step_back`; 0 disables history
    pub history_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instructions_per_tick: INSTRUCTIONS_PER_TICK,
            history_depth: MAX_SAVED_STATES,
        }
    }
}
