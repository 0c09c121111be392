//! What an agent reports about each tick and about its whole run.

use std::fmt;

use fl_behavior::RuleOutcome;
use fl_core::{AgentId, Tick, Vec2};
use fl_mobility::DriveCommand;

use crate::KinematicState;

/// Everything that happened in one successful tick.
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub agent:          AgentId,
    pub tick:           Tick,
    /// State committed at the end of the tick.
    pub state:          KinematicState,
    /// `false` when the position source had no fix and the previous
    /// position was kept.
    pub position_fresh: bool,
    /// Peers in the neighbor table this tick.
    pub neighbors:      usize,
    /// Combined steering force before it was added to the velocity.
    pub force:          Vec2,
    pub outcomes:       Vec<RuleOutcome>,
    pub command:        DriveCommand,
}

/// Why an agent's run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// A stop was requested from outside.
    Signal,
    /// The configured tick limit was reached.
    MaxTicks,
    /// A tick failed or panicked; the message says why.
    Fault(String),
    /// Collaborators never became ready within the startup timeout.
    NotReady,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Signal => "signal",
            StopReason::MaxTicks => "max_ticks",
            StopReason::Fault(_) => "fault",
            StopReason::NotReady => "not_ready",
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, StopReason::Fault(_))
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Fault(msg) => write!(f, "fault: {msg}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Returned by [`Agent::run`][crate::Agent::run].
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub agent:       AgentId,
    /// Ticks that completed successfully.
    pub ticks:       u64,
    pub reason:      StopReason,
    /// Ticks that finished after their scheduled boundary.
    pub overruns:    u64,
    pub final_state: KinematicState,
}
