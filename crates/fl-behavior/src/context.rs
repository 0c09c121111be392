//! Read-only inputs passed to every steering rule.

use fl_core::{AgentId, Tick, Vec2};

/// What an agent knows about one peer, as of that peer's latest broadcast.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NeighborEntry {
    pub id:       AgentId,
    pub position: Vec2,
    pub velocity: Vec2,
    /// The receiving agent's tick when this entry was written.
    pub received: Tick,
}

/// The evaluating agent's own kinematic inputs.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OwnState {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// A snapshot of everything a rule may look at during one tick.
///
/// Built once per tick by the agent after its neighbor table has been
/// refreshed; all borrows live only for that tick's rule evaluation.
pub struct RuleContext<'a> {
    pub own: OwnState,

    /// Neighbors heard from this tick.  May be empty.
    pub neighbors: &'a [NeighborEntry],

    /// `(MIN_LINEAR_SPEED, MAX_LINEAR_SPEED)`: every rule clamps its
    /// steering vector into this band.
    pub speed_limits: (f64, f64),
}

impl<'a> RuleContext<'a> {
    #[inline]
    pub fn new(own: OwnState, neighbors: &'a [NeighborEntry], speed_limits: (f64, f64)) -> Self {
        Self { own, neighbors, speed_limits }
    }

    /// Clamp `v` into [`speed_limits`](Self::speed_limits).
    #[inline]
    pub fn clamp(&self, v: Vec2) -> Vec2 {
        fl_core::clamp_speed(v, self.speed_limits.0, self.speed_limits.1)
    }
}
