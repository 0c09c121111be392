//! `SwarmRunner`: one OS thread per robot.
//!
//! Agents share nothing but their channels; each thread owns its agent,
//! collaborators, and observer outright.  All agents of one runner share a
//! single [`StopSignal`], so [`SwarmRunner::stop_all`] wakes every sleeping
//! agent at once.

use std::collections::HashSet;
use std::thread::{self, JoinHandle};

use fl_agent::{
    AgentBuilder, AgentObserver, Lifecycle, LifecycleCell, NoopObserver, RunSummary, StopSignal,
};
use fl_comms::CommunicationChannel;
use fl_core::{AgentId, FlockConfig, RobotKind, Vec2};
use fl_mobility::{Actuation, PositionSource};
use tracing::{error, info};

use crate::{SimError, SimResult};

/// Observer handed to one agent thread.
pub type BoxedObserver = Box<dyn AgentObserver + Send>;

/// Everything needed to start one agent.
pub struct AgentSpec {
    pub id:       AgentId,
    pub kind:     RobotKind,
    pub start:    Vec2,
    pub heading:  f64,
    pub position: Box<dyn PositionSource>,
    pub channel:  Box<dyn CommunicationChannel>,
    pub actuator: Box<dyn Actuation>,
    pub observer: BoxedObserver,
}

impl AgentSpec {
    pub fn new(
        id:       AgentId,
        position: Box<dyn PositionSource>,
        channel:  Box<dyn CommunicationChannel>,
        actuator: Box<dyn Actuation>,
    ) -> Self {
        Self {
            id,
            kind: RobotKind::default(),
            start: Vec2::ZERO,
            heading: 0.0,
            position,
            channel,
            actuator,
            observer: Box::new(NoopObserver),
        }
    }

    pub fn kind(mut self, kind: RobotKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn start(mut self, position: Vec2, heading: f64) -> Self {
        self.start = position;
        self.heading = heading;
        self
    }

    pub fn observer(mut self, observer: BoxedObserver) -> Self {
        self.observer = observer;
        self
    }
}

struct Running {
    id:        AgentId,
    lifecycle: LifecycleCell,
    handle:    JoinHandle<RunSummary>,
}

/// Handle on a running swarm.
pub struct SwarmRunner {
    agents: Vec<Running>,
    stop:   StopSignal,
}

impl SwarmRunner {
    /// Validate `config`, then start one thread per spec.
    ///
    /// # Errors
    ///
    /// Invalid configuration or a duplicate agent id, before any thread is
    /// started.  If a thread fails to spawn, agents already started are
    /// stopped and joined before the error is returned.
    pub fn spawn(config: &FlockConfig, specs: Vec<AgentSpec>) -> SimResult<Self> {
        config.validate()?;

        let mut seen = HashSet::with_capacity(specs.len());
        for spec in &specs {
            if !seen.insert(spec.id) {
                return Err(SimError::DuplicateAgent(spec.id));
            }
        }

        let stop = StopSignal::new();
        let mut runner = SwarmRunner { agents: Vec::with_capacity(specs.len()), stop: stop.clone() };

        for spec in specs {
            let AgentSpec { id, kind, start, heading, position, channel, actuator, mut observer } = spec;
            let mut agent = AgentBuilder::new(id, config)
                .kind(kind)
                .start(start, heading)
                .stop_signal(stop.clone())
                .build(position, channel, actuator);
            let lifecycle = agent.lifecycle_handle();

            let spawned = thread::Builder::new()
                .name(format!("agent-{}", id.0))
                .spawn(move || agent.run(&mut observer));

            match spawned {
                Ok(handle) => runner.agents.push(Running { id, lifecycle, handle }),
                Err(source) => {
                    error!(agent = %id, error = %source, "failed to spawn agent thread");
                    runner.stop_all();
                    let _ = runner.join_all();
                    return Err(SimError::Spawn { agent: id, source });
                }
            }
        }

        info!(agents = runner.agents.len(), "swarm started");
        Ok(runner)
    }

    /// Ask every agent to finish its current tick and stop.
    pub fn stop_all(&self) {
        self.stop.request();
    }

    /// The shared stop signal, e.g. for a Ctrl-C handler.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Current lifecycle state of every agent, in spawn order.
    pub fn lifecycles(&self) -> Vec<(AgentId, Lifecycle)> {
        self.agents.iter().map(|a| (a.id, a.lifecycle.get())).collect()
    }

    /// `true` once every agent has reached `Stopped`.
    pub fn all_stopped(&self) -> bool {
        self.agents.iter().all(|a| a.lifecycle.get() == Lifecycle::Stopped)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Block until every agent thread has exited.
    pub fn join_all(self) -> Vec<(AgentId, SimResult<RunSummary>)> {
        self.agents
            .into_iter()
            .map(|a| {
                let result = a.handle.join().map_err(|_| {
                    error!(agent = %a.id, "agent thread panicked");
                    SimError::AgentPanicked(a.id)
                });
                (a.id, result)
            })
            .collect()
    }
}
