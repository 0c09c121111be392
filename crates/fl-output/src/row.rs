//! Plain data row types written by output backends.

use fl_agent::{RunSummary, StopReason, TickReport};

/// One agent's state at the end of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTickRow {
    pub agent_id:         u32,
    pub tick:             u64,
    pub x:                f64,
    pub y:                f64,
    /// Heading accumulator, radians; not wrapped unless `WRAP_HEADING` is set.
    pub heading:          f64,
    pub vx:               f64,
    pub vy:               f64,
    pub linear_velocity:  f64,
    pub angular_velocity: f64,
    /// Yaw actually sent to the drive, whole degrees.
    pub yaw_degrees:      i32,
    pub neighbors:        u64,
    /// `false` when the position source had no fix this tick.
    pub position_fresh:   bool,
    pub force_x:          f64,
    pub force_y:          f64,
}

impl From<&TickReport> for AgentTickRow {
    fn from(r: &TickReport) -> Self {
        Self {
            agent_id:         r.agent.0,
            tick:             r.tick.0,
            x:                r.state.position.x,
            y:                r.state.position.y,
            heading:          r.state.heading,
            vx:               r.state.velocity.x,
            vy:               r.state.velocity.y,
            linear_velocity:  r.command.linear_velocity,
            angular_velocity: r.command.angular_velocity,
            yaw_degrees:      r.command.yaw_degrees(),
            neighbors:        r.neighbors as u64,
            position_fresh:   r.position_fresh,
            force_x:          r.force.x,
            force_y:          r.force.y,
        }
    }
}

/// How one agent's run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummaryRow {
    pub agent_id:      u32,
    pub ticks:         u64,
    pub reason:        String,
    /// Fault message; empty unless `reason` is `fault`.
    pub detail:        String,
    pub overruns:      u64,
    pub final_x:       f64,
    pub final_y:       f64,
    pub final_heading: f64,
}

impl From<&RunSummary> for RunSummaryRow {
    fn from(s: &RunSummary) -> Self {
        let detail = match &s.reason {
            StopReason::Fault(msg) => msg.clone(),
            _ => String::new(),
        };
        Self {
            agent_id:      s.agent.0,
            ticks:         s.ticks,
            reason:        s.reason.as_str().to_owned(),
            detail,
            overruns:      s.overruns,
            final_x:       s.final_state.position.x,
            final_y:       s.final_state.position.y,
            final_heading: s.final_state.heading,
        }
    }
}
