//! Simulated experiment setup: which robots, where they start, how noisy the
//! world is.
//!
//! ```json
//! {
//!   "SEED": 7,
//!   "POSITION_NOISE": 0.01,
//!   "POSITION_DROPOUT": 0.05,
//!   "RADIO_LOSS": 0.1,
//!   "ROBOTS": [
//!     { "ID": 1, "KIND": "rover",  "START": { "x": 1.0, "y": 1.0 }, "HEADING": 0.0 },
//!     { "ID": 2, "KIND": "sphere", "START": { "x": 3.0, "y": 1.5 }, "HEADING": 1.57 }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::f64::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use fl_agent::{Agent, AgentBuilder, StopSignal};
use fl_comms::{CommunicationChannel, InMemoryBus, LossyChannel};
use fl_core::{AgentId, AgentRng, Arena, FlockConfig, FlockError, RobotKind, SimRng, Vec2};

use crate::{
    AgentSpec, SimError, SimResult, SimWorld, SimulatedActuator, SimulatedPositionSource,
};

/// Clearance kept between a scattered robot and the walls, metres.
const SCATTER_MARGIN: f64 = 0.3;

/// One robot's starting placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RobotSpec {
    pub id:      AgentId,
    #[serde(default)]
    pub kind:    RobotKind,
    pub start:   Vec2,
    #[serde(default)]
    pub heading: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Scenario {
    #[serde(default)]
    pub seed:             u64,
    /// Uniform position noise amplitude, metres.
    #[serde(default)]
    pub position_noise:   f64,
    /// Probability of no position fix on a tick.
    #[serde(default)]
    pub position_dropout: f64,
    /// Probability that a received peer update is lost.
    #[serde(default)]
    pub radio_loss:       f64,
    pub robots:           Vec<RobotSpec>,
}

/// The collaborator types a simulated agent is built from.
pub type SimAgent = Agent<SimulatedPositionSource, Box<dyn CommunicationChannel>, SimulatedActuator>;

impl Scenario {
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let scenario: Scenario = serde_json::from_str(json).map_err(FlockError::from)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load_json(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path).map_err(FlockError::from)?;
        Self::from_json_str(&text)
    }

    /// `n` rovers scattered uniformly over the arena with random headings,
    /// ids `0..n`.
    pub fn scatter(n: usize, arena: Arena, seed: u64) -> SimResult<Self> {
        let mut rng = SimRng::new(seed);
        let mut robots = Vec::with_capacity(n);
        for i in 0..n {
            let id = AgentId::try_from(i).map_err(|e| SimError::Scenario(e.to_string()))?;
            let start = Vec2::new(
                rng.uniform(SCATTER_MARGIN, arena.width - SCATTER_MARGIN),
                rng.uniform(SCATTER_MARGIN, arena.length - SCATTER_MARGIN),
            )
            .rounded();
            let heading = rng.uniform(-PI, PI);
            robots.push(RobotSpec { id, kind: RobotKind::Rover, start, heading });
        }
        Ok(Self { seed, position_noise: 0.0, position_dropout: 0.0, radio_loss: 0.0, robots })
    }

    /// Reject duplicate ids and out-of-range probabilities.
    pub fn validate(&self) -> SimResult<()> {
        let mut seen = HashSet::new();
        for robot in &self.robots {
            if !seen.insert(robot.id) {
                return Err(SimError::DuplicateAgent(robot.id));
            }
            if !robot.start.is_finite() || !robot.heading.is_finite() {
                return Err(SimError::Scenario(format!("{} has a non-finite start", robot.id)));
            }
        }
        for (name, p) in [("POSITION_DROPOUT", self.position_dropout), ("RADIO_LOSS", self.radio_loss)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(SimError::Scenario(format!("{name} must be in [0, 1], got {p}")));
            }
        }
        if !self.position_noise.is_finite() || self.position_noise < 0.0 {
            return Err(SimError::Scenario("POSITION_NOISE must be >= 0".into()));
        }
        Ok(())
    }

    /// Create the world and place every robot in it.
    pub fn world(&self, config: &FlockConfig) -> SimWorld {
        let world = SimWorld::new(config.arena(), config.tick_period());
        for robot in &self.robots {
            world.place(robot.id, robot.start, robot.heading);
        }
        world
    }

    fn collaborators(
        &self,
        robot: &RobotSpec,
        world: &SimWorld,
        bus: &InMemoryBus,
    ) -> SimResult<(SimulatedPositionSource, Box<dyn CommunicationChannel>, SimulatedActuator)> {
        let position = world
            .position_source(robot.id, AgentRng::new(self.seed, robot.id))
            .with_noise(self.position_noise)
            .with_dropout(self.position_dropout);

        let endpoint = bus.subscribe(robot.id)?;
        let channel: Box<dyn CommunicationChannel> = if self.radio_loss > 0.0 {
            // Offset the seed so radio loss is independent of position noise.
            let rng = AgentRng::new(self.seed.wrapping_add(1), robot.id);
            Box::new(LossyChannel::new(endpoint, rng, self.radio_loss))
        } else {
            Box::new(endpoint)
        };

        Ok((position, channel, world.actuator(robot.id)))
    }

    /// Agents for the lockstep harness, wired to `world` and `bus`.
    pub fn build_agents(
        &self,
        config: &FlockConfig,
        world: &SimWorld,
        bus: &InMemoryBus,
        stop: &StopSignal,
    ) -> SimResult<Vec<SimAgent>> {
        self.robots
            .iter()
            .map(|robot| {
                let (position, channel, actuator) = self.collaborators(robot, world, bus)?;
                Ok(AgentBuilder::new(robot.id, config)
                    .kind(robot.kind)
                    .start(robot.start, robot.heading)
                    .stop_signal(stop.clone())
                    .build(position, channel, actuator))
            })
            .collect()
    }

    /// Specs for the threaded [`SwarmRunner`][crate::SwarmRunner].
    pub fn build_specs(&self, world: &SimWorld, bus: &InMemoryBus) -> SimResult<Vec<AgentSpec>> {
        self.robots
            .iter()
            .map(|robot| {
                let (position, channel, actuator) = self.collaborators(robot, world, bus)?;
                Ok(AgentSpec::new(robot.id, Box::new(position), channel, Box::new(actuator))
                    .kind(robot.kind)
                    .start(robot.start, robot.heading))
            })
            .collect()
    }
}
