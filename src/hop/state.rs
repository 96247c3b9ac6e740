//! Tick decision logic, free of any memory access

use std::fmt;

/// Bit of the flag word that marks the player as airborne.
///
/// Only this bit is consulted. The two values seen in practice, `0x8000`
/// and `0xFFFFFFFF`, differ in it; other values are untested.
pub const AIRBORNE_BIT: u32 = 1;

/// Observed state of the local player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HopState {
    #[default]
    Grounded,
    Airborne,
}

impl HopState {
    /// Derive the state from a raw flag word
    pub fn from_flags(flag_word: u32) -> Self {
        if is_airborne(flag_word) {
            HopState::Airborne
        } else {
            HopState::Grounded
        }
    }
}

impl fmt::Display for HopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HopState::Grounded => write!(f, "grounded"),
            HopState::Airborne => write!(f, "airborne"),
        }
    }
}

/// Which control value a tick writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    /// Wait the engage delay, then write the engage value
    Engage,
    /// Write the disengage value immediately
    Disengage,
}

/// Result of one step of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: HopState,
    pub to: HopState,
    pub decision: WriteDecision,
}

impl Transition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// True when the low bit of the flag word is set
pub fn is_airborne(flag_word: u32) -> bool {
    flag_word & AIRBORNE_BIT != 0
}

/// Decide the next state and write from the airborne bit and the input
pub fn plan(airborne: bool, input_active: bool) -> (HopState, WriteDecision) {
    let state = if airborne {
        HopState::Airborne
    } else {
        HopState::Grounded
    };
    let decision = if input_active && !airborne {
        WriteDecision::Engage
    } else {
        WriteDecision::Disengage
    };
    (state, decision)
}

/// Advance the state machine by one tick
pub fn step(current: HopState, flag_word: u32, input_active: bool) -> Transition {
    let (to, decision) = plan(is_airborne(flag_word), input_active);

    Transition {
        from: current,
        to,
        decision,
    }
}
