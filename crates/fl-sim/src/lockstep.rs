//! Deterministic stepping harness.
//!
//! [`LockstepSim`] drives a set of agents on the calling thread: one call to
//! [`step`](LockstepSim::step) ticks every running agent once, in ascending
//! id order, with no sleeping.  Given a seeded scenario and the in-memory
//! bus, two runs produce identical trajectories.
//!
//! With the `parallel` feature the ticks of one step run on Rayon's pool.
//! Observer callbacks are still made afterwards in id order, but the order in
//! which agents broadcast within a step is no longer fixed.

use fl_agent::{Agent, AgentObserver, Lifecycle, RunSummary, StopReason, TickReport};
use fl_comms::CommunicationChannel;
use fl_mobility::{Actuation, PositionSource};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub struct LockstepSim<P, C, A> {
    agents:    Vec<Agent<P, C, A>>,
    summaries: Vec<Option<RunSummary>>,
    steps:     u64,
}

impl<P, C, A> LockstepSim<P, C, A>
where
    P: PositionSource,
    C: CommunicationChannel,
    A: Actuation,
{
    pub fn new(mut agents: Vec<Agent<P, C, A>>) -> Self {
        agents.sort_by_key(|a| a.id());
        let summaries = agents.iter().map(|_| None).collect();
        Self { agents, summaries, steps: 0 }
    }

    pub fn agents(&self) -> &[Agent<P, C, A>] {
        &self.agents
    }

    /// Steps taken so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Number of agents still running.
    pub fn running(&self) -> usize {
        self.summaries.iter().filter(|s| s.is_none()).count()
    }

    /// Activate every agent whose collaborators are ready.  Agents that are
    /// not ready are stopped at once with [`StopReason::NotReady`]; there is
    /// no waiting in lockstep mode.
    pub fn start<O: AgentObserver + ?Sized>(&mut self, observer: &mut O) {
        for (agent, summary) in self.agents.iter_mut().zip(self.summaries.iter_mut()) {
            if summary.is_some() || agent.lifecycle() == Lifecycle::Running {
                continue;
            }
            if agent.collaborators_ready() {
                agent.activate(observer);
            } else {
                *summary = Some(agent.shutdown(StopReason::NotReady, observer));
            }
        }
        info!(agents = self.agents.len(), running = self.running(), "lockstep started");
    }

    /// Tick every running agent once.  Returns how many agents are still
    /// running afterwards.
    pub fn step<O: AgentObserver + ?Sized>(&mut self, observer: &mut O) -> usize {
        let results = self.tick_all();
        for ((agent, summary), result) in
            self.agents.iter_mut().zip(self.summaries.iter_mut()).zip(results)
        {
            let Some(result) = result else { continue };
            match result {
                Ok(report) => {
                    if let Err(msg) = agent.report_tick(&report, observer) {
                        *summary = Some(agent.shutdown(StopReason::Fault(msg), observer));
                    } else if agent.tick_limit_reached() {
                        *summary = Some(agent.shutdown(StopReason::MaxTicks, observer));
                    }
                }
                Err(msg) => *summary = Some(agent.shutdown(StopReason::Fault(msg), observer)),
            }
        }
        self.steps += 1;
        let running = self.running();
        debug!(step = self.steps, running, "lockstep step");
        running
    }

    #[cfg(not(feature = "parallel"))]
    fn tick_all(&mut self) -> Vec<Option<Result<TickReport, String>>> {
        self.agents
            .iter_mut()
            .zip(self.summaries.iter())
            .map(|(agent, summary)| summary.is_none().then(|| agent.guarded_tick()))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn tick_all(&mut self) -> Vec<Option<Result<TickReport, String>>> {
        self.agents
            .par_iter_mut()
            .zip(self.summaries.par_iter())
            .map(|(agent, summary)| summary.is_none().then(|| agent.guarded_tick()))
            .collect()
    }

    /// Start, then step until every agent has stopped or `max_steps` steps
    /// have been taken.  Agents still running at the end are stopped with
    /// [`StopReason::Signal`].  Summaries come back in id order.
    pub fn run<O: AgentObserver + ?Sized>(mut self, max_steps: u64, observer: &mut O) -> Vec<RunSummary> {
        self.start(observer);
        while self.steps < max_steps && self.running() > 0 {
            self.step(observer);
        }
        self.finish(observer)
    }

    /// Stop every agent still running and collect all summaries.
    pub fn finish<O: AgentObserver + ?Sized>(mut self, observer: &mut O) -> Vec<RunSummary> {
        self.agents
            .iter_mut()
            .zip(self.summaries)
            .map(|(agent, summary)| summary.unwrap_or_else(|| agent.shutdown(StopReason::Signal, observer)))
            .collect()
    }
}
