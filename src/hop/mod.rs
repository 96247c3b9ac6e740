//! Jump assist control loop
//!
//! `state` holds the pure per-tick decision and `poll` drives it against
//! target memory through [`SafeAccess`](crate::memory::SafeAccess).

mod poll;
mod state;

pub use poll::{PollConfig, PollLoop, TickError, TickReport, TickStage, TickStats};
pub use state::{is_airborne, plan, step, HopState, Transition, WriteDecision, AIRBORNE_BIT};
