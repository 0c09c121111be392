//! Position fixes from an external tracking feed.
//!
//! A tracking client (motion capture, or a robot's own odometry stream) runs
//! on its own thread and calls [`LocatorFeed::publish`] with raw samples in
//! the feed's native units and axes.  Each agent reads through a
//! [`LocatorSource`], which converts the raw sample to arena metres and
//! rejects samples older than an optional maximum age.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use fl_core::{AgentId, Vec2};
use tracing::trace;

use crate::PositionSource;

/// Native coordinate frame of a tracking feed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Already arena metres.
    Arena,
    /// Motion-capture millimetres, same axes as the arena.
    Mocap,
    /// Rover odometry: forward is the arena's -y axis, left is +x.
    /// Arena `x = Y`, arena `y = -X`.
    RoverOdometry,
}

impl Frame {
    /// Convert a raw `(X, Y)` sample into arena metres.
    pub fn to_arena(self, raw: Vec2) -> Vec2 {
        match self {
            Frame::Arena => raw,
            Frame::Mocap => (raw / 1_000.0).rounded(),
            Frame::RoverOdometry => Vec2::new(raw.y, -raw.x),
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct Sample {
    raw: Vec2,
    at:  Instant,
}

/// Latest raw sample per robot, shared between the feed thread and agents.
#[derive(Clone, Default)]
pub struct LocatorFeed {
    samples: Arc<RwLock<HashMap<AgentId, Sample>>>,
}

impl LocatorFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a raw sample for `agent`, replacing the previous one.
    pub fn publish(&self, agent: AgentId, raw: Vec2) {
        self.publish_at(agent, raw, Instant::now());
    }

    /// [`publish`](Self::publish) with an explicit capture time.
    pub fn publish_at(&self, agent: AgentId, raw: Vec2, at: Instant) {
        if let Ok(mut samples) = self.samples.write() {
            samples.insert(agent, Sample { raw, at });
        }
    }

    fn latest(&self, agent: AgentId) -> Option<Sample> {
        self.samples.read().ok()?.get(&agent).copied()
    }

    /// `true` once any robot has been seen.
    pub fn has_samples(&self) -> bool {
        self.samples.read().map(|s| !s.is_empty()).unwrap_or(false)
    }
}

/// One agent's reader over a [`LocatorFeed`].
#[derive(Clone)]
pub struct LocatorSource {
    feed:    LocatorFeed,
    frame:   Frame,
    max_age: Option<Duration>,
}

impl LocatorSource {
    pub fn new(feed: LocatorFeed, frame: Frame) -> Self {
        Self { feed, frame, max_age: None }
    }

    /// Treat samples older than `max_age` as missing.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }
}

impl PositionSource for LocatorSource {
    fn get_position(&mut self, agent: AgentId) -> Option<Vec2> {
        let sample = self.feed.latest(agent)?;
        if let Some(max_age) = self.max_age {
            let age = sample.at.elapsed();
            if age > max_age {
                trace!(%agent, age_ms = age.as_millis() as u64, "stale locator sample");
                return None;
            }
        }
        Some(self.frame.to_arena(sample.raw))
    }

    fn is_ready(&self) -> bool {
        self.feed.has_samples()
    }
}
