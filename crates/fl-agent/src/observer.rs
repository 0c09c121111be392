//! Agent observer trait for progress reporting and data collection.

use fl_core::AgentId;

use crate::{Lifecycle, RunSummary, TickReport};

/// Callbacks invoked by [`Agent::run`][crate::Agent::run] (and by the
/// lockstep harness) at key points of an agent's life.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers run on the agent's own
/// thread, inside the tick budget; keep them cheap.
///
/// # Example: log every hundredth tick
///
/// ```rust,ignore
/// struct Every100;
///
/// impl AgentObserver for Every100 {
///     fn on_tick_end(&mut self, report: &TickReport) {
///         if report.tick.0 % 100 == 0 {
///             println!("{} at {}: {}", report.agent, report.tick, report.state.position);
///         }
///     }
/// }
/// ```
pub trait AgentObserver {
    /// Called on every lifecycle transition, including the initial
    /// `Initializing`.
    fn on_state_change(&mut self, _agent: AgentId, _state: Lifecycle) {}

    /// Called after each successful tick.
    fn on_tick_end(&mut self, _report: &TickReport) {}

    /// Called once, after the final stop command has been issued.
    fn on_stopped(&mut self, _summary: &RunSummary) {}
}

/// An [`AgentObserver`] that does nothing.
pub struct NoopObserver;

impl AgentObserver for NoopObserver {}

impl<O: AgentObserver + ?Sized> AgentObserver for Box<O> {
    fn on_state_change(&mut self, agent: AgentId, state: Lifecycle) {
        (**self).on_state_change(agent, state)
    }

    fn on_tick_end(&mut self, report: &TickReport) {
        (**self).on_tick_end(report)
    }

    fn on_stopped(&mut self, summary: &RunSummary) {
        (**self).on_stopped(summary)
    }
}
