//! Fluent builder for [`Agent`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use fl_agent::AgentBuilder;
//!
//! let agent = AgentBuilder::new(AgentId(3), &config)
//!     .kind(RobotKind::Sphere)
//!     .start(Vec2::new(1.0, 2.0), 0.0)
//!     .build(position_source, channel, actuator);
//! ```
//!
//! Everything derived from [`FlockConfig`] (rules, controller gains, speed
//! band, tick limits) is resolved once here; the agent never looks at the
//! configuration again.

use fl_behavior::BehaviorSet;
use fl_comms::CommunicationChannel;
use fl_core::{AgentId, FlockConfig, Footprint, RobotKind, Tick, Vec2};
use fl_mobility::{Actuation, HeadingController, PositionSource};

use crate::{Agent, KinematicState, LifecycleCell, NeighborTable, StopSignal};

pub struct AgentBuilder<'c> {
    id:        AgentId,
    config:    &'c FlockConfig,
    kind:      RobotKind,
    footprint: Option<Footprint>,
    start:     Vec2,
    heading:   f64,
    behaviors: Option<BehaviorSet>,
    stop:      Option<StopSignal>,
}

impl<'c> AgentBuilder<'c> {
    /// Start building agent `id`.  `config` must already be validated.
    pub fn new(id: AgentId, config: &'c FlockConfig) -> Self {
        Self {
            id,
            config,
            kind: RobotKind::default(),
            footprint: None,
            start: Vec2::ZERO,
            heading: 0.0,
            behaviors: None,
            stop: None,
        }
    }

    /// Robot model; also selects the default footprint.
    pub fn kind(mut self, kind: RobotKind) -> Self {
        self.kind = kind;
        self
    }

    /// Override the footprint implied by [`kind`](Self::kind).
    pub fn footprint(mut self, footprint: Footprint) -> Self {
        self.footprint = Some(footprint);
        self
    }

    /// Starting position and heading (radians).
    pub fn start(mut self, position: Vec2, heading: f64) -> Self {
        self.start = position;
        self.heading = heading;
        self
    }

    /// Replace the rule set built from the configuration.
    pub fn behaviors(mut self, behaviors: BehaviorSet) -> Self {
        self.behaviors = Some(behaviors);
        self
    }

    /// Share a stop signal (e.g. one signal for the whole swarm).
    pub fn stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = Some(stop);
        self
    }

    pub fn build<P, C, A>(self, position: P, channel: C, actuator: A) -> Agent<P, C, A>
    where
        P: PositionSource,
        C: CommunicationChannel,
        A: Actuation,
    {
        let config = self.config;
        Agent {
            id:              self.id,
            kind:            self.kind,
            footprint:       self.footprint.unwrap_or_else(|| self.kind.footprint()),
            behaviors:       self.behaviors.unwrap_or_else(|| BehaviorSet::from_config(config)),
            controller:      HeadingController::from_config(config),
            speed_limits:    (config.min_linear_speed, config.max_linear_speed),
            wrap_heading:    config.wrap_heading,
            tick_limit:      config.tick_limit(),
            tick_period:     config.tick_period(),
            startup_timeout: config.startup_timeout(),
            position,
            channel,
            actuator,
            state:           KinematicState::initial(self.start, self.heading, config),
            neighbors:       NeighborTable::new(),
            tick:            Tick::ZERO,
            overruns:        0,
            lifecycle:       LifecycleCell::default(),
            stop:            self.stop.unwrap_or_default(),
        }
    }
}
