//! A shared kinematic arena that stands in for real robots and tracking.
//!
//! Every simulated robot has a [`Pose`].  Its [`SimulatedActuator`] moves
//! the pose one tick's worth along the commanded yaw, and its
//! [`SimulatedPositionSource`] reads the pose back, optionally with noise
//! and dropouts.  Robots are kept inside the arena walls.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use fl_core::{AgentId, AgentRng, Arena, Vec2};
use fl_mobility::{Actuation, ActuationError, ActuationResult, DriveCommand, PositionSource};

/// Ground truth for one simulated robot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    pub position:        Vec2,
    /// Radians, wrapped from the last yaw command.
    pub heading:         f64,
    pub linear_velocity: f64,
}

#[derive(Clone)]
pub struct SimWorld {
    arena: Arena,
    /// Seconds of motion per drive command.
    dt:    f64,
    poses: Arc<RwLock<HashMap<AgentId, Pose>>>,
}

impl SimWorld {
    pub fn new(arena: Arena, tick_period: Duration) -> Self {
        Self { arena, dt: tick_period.as_secs_f64(), poses: Arc::default() }
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    /// Put `agent` at `position`, at rest.
    pub fn place(&self, agent: AgentId, position: Vec2, heading: f64) {
        if let Ok(mut poses) = self.poses.write() {
            poses.insert(agent, Pose { position, heading, linear_velocity: 0.0 });
        }
    }

    pub fn pose(&self, agent: AgentId) -> Option<Pose> {
        self.poses.read().ok()?.get(&agent).copied()
    }

    /// All poses, sorted by agent id.
    pub fn poses(&self) -> Vec<(AgentId, Pose)> {
        let mut all: Vec<(AgentId, Pose)> = self
            .poses
            .read()
            .map(|p| p.iter().map(|(&id, &pose)| (id, pose)).collect())
            .unwrap_or_default();
        all.sort_by_key(|(id, _)| *id);
        all
    }

    pub fn actuator(&self, agent: AgentId) -> SimulatedActuator {
        SimulatedActuator { world: self.clone(), agent }
    }

    /// Tracking for `agent`, ready once that robot is placed.
    pub fn position_source(&self, agent: AgentId, rng: AgentRng) -> SimulatedPositionSource {
        SimulatedPositionSource { world: self.clone(), agent, rng, noise: 0.0, dropout: 0.0 }
    }

    fn update<F>(&self, agent: AgentId, f: F) -> ActuationResult<()>
    where
        F: FnOnce(&mut Pose),
    {
        let mut poses = self.poses.write().map_err(|_| ActuationError::Poisoned)?;
        let pose = poses
            .get_mut(&agent)
            .ok_or_else(|| ActuationError::Driver(format!("{agent} is not placed in the world")))?;
        f(pose);
        Ok(())
    }
}

// ── SimulatedActuator ─────────────────────────────────────────────────────────

/// Moves a robot's pose in a [`SimWorld`].
///
/// Uses the whole-degree yaw a real drive would receive, so the simulated
/// robot sees the same heading quantisation.
pub struct SimulatedActuator {
    world: SimWorld,
    agent: AgentId,
}

impl Actuation for SimulatedActuator {
    fn drive(&mut self, command: &DriveCommand) -> ActuationResult<()> {
        let heading = f64::from(command.yaw_degrees()).to_radians();
        let step = Vec2::from_angle(heading, command.linear_velocity * self.world.dt);
        let arena = self.world.arena;
        self.world.update(self.agent, |pose| {
            let moved = pose.position + step;
            pose.position = Vec2::new(moved.x.clamp(0.0, arena.width), moved.y.clamp(0.0, arena.length))
                .rounded();
            pose.heading = heading;
            pose.linear_velocity = command.linear_velocity;
        })
    }

    fn stop(&mut self) -> ActuationResult<()> {
        self.world.update(self.agent, |pose| pose.linear_velocity = 0.0)
    }
}

// ── SimulatedPositionSource ───────────────────────────────────────────────────

/// Reads poses back out of a [`SimWorld`].
pub struct SimulatedPositionSource {
    world:   SimWorld,
    agent:   AgentId,
    rng:     AgentRng,
    noise:   f64,
    dropout: f64,
}

impl SimulatedPositionSource {
    /// Add uniform noise of up to `amplitude` metres on each axis.
    pub fn with_noise(mut self, amplitude: f64) -> Self {
        self.noise = amplitude.max(0.0);
        self
    }

    /// Report no fix with probability `p` on each read.
    pub fn with_dropout(mut self, p: f64) -> Self {
        self.dropout = p.clamp(0.0, 1.0);
        self
    }
}

impl PositionSource for SimulatedPositionSource {
    fn get_position(&mut self, agent: AgentId) -> Option<Vec2> {
        let pose = self.world.pose(agent)?;
        if self.dropout > 0.0 && self.rng.gen_bool(self.dropout) {
            return None;
        }
        let jitter = Vec2::new(self.rng.symmetric(self.noise), self.rng.symmetric(self.noise));
        Some((pose.position + jitter).rounded())
    }

    fn is_ready(&self) -> bool {
        self.world.pose(self.agent).is_some()
    }
}
