//! Rules that react to the environment rather than to neighbors.

use fl_core::{Arena, FlockConfig, Obstacle, Vec2};

use crate::{RuleContext, RuleOutput, SteeringRule};

// ── WallAvoidance ─────────────────────────────────────────────────────────────

/// Push back toward the interior when within `range` of an arena wall.
///
/// Each axis contributes at most once: the low-x wall is checked before the
/// high-x wall, the high-y wall before the low-y wall.  In a corner both axes
/// push, and the result is clamped like any other rule.
#[derive(Copy, Clone, Debug)]
pub struct WallAvoidance {
    pub arena:       Arena,
    pub range:       f64,
    pub turn_factor: f64,
}

impl WallAvoidance {
    pub fn from_config(config: &FlockConfig) -> Self {
        Self {
            arena:       config.arena(),
            range:       config.wall_avoidance_range,
            turn_factor: config.turn_factor(),
        }
    }
}

impl SteeringRule for WallAvoidance {
    fn name(&self) -> &'static str {
        "wall_avoidance"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutput {
        let p = ctx.own.position;
        let mut push = Vec2::ZERO;
        let mut walls = 0;

        if p.x < self.range {
            push.x += self.turn_factor;
            walls += 1;
        } else if p.x > self.arena.width - self.range {
            push.x -= self.turn_factor;
            walls += 1;
        }

        if p.y > self.arena.length - self.range {
            push.y -= self.turn_factor;
            walls += 1;
        } else if p.y < self.range {
            push.y += self.turn_factor;
            walls += 1;
        }

        if walls == 0 {
            return RuleOutput::NONE;
        }
        RuleOutput::new(ctx.clamp(push), walls)
    }
}

// ── ObstacleAvoidance ─────────────────────────────────────────────────────────

/// Clearance added to each obstacle's half-extent, metres.
pub const OBSTACLE_SAFETY_MARGIN: f64 = 0.3;

/// Fraction of the vision distance used for the near look-ahead point.
const NEAR_LOOKAHEAD: f64 = 0.5;

/// Steer away from static rectangular obstacles the agent is heading into.
///
/// Two points are projected along the current velocity, at `vision` and
/// `vision / 2`.  For every obstacle whose padded box contains one of them,
/// the push is `(point - centre) * gain`, using the near point when both are
/// inside.  Pushes from several obstacles add up before clamping.
#[derive(Clone, Debug)]
pub struct ObstacleAvoidance {
    pub obstacles: Vec<Obstacle>,
    pub vision:    f64,
    pub gain:      f64,
}

impl ObstacleAvoidance {
    pub fn from_config(config: &FlockConfig) -> Self {
        Self {
            obstacles: config.obstacles.clone(),
            vision:    config.obstacle_vision,
            gain:      config.obstacle_avoid_gain,
        }
    }

    fn inside(obstacle: &Obstacle, point: Vec2) -> bool {
        let d = point - obstacle.center;
        d.x.abs() <= obstacle.half_extent.x + OBSTACLE_SAFETY_MARGIN
            && d.y.abs() <= obstacle.half_extent.y + OBSTACLE_SAFETY_MARGIN
    }
}

impl SteeringRule for ObstacleAvoidance {
    fn name(&self) -> &'static str {
        "obstacle_avoidance"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutput {
        let p = ctx.own.position;
        let v = ctx.own.velocity;
        let far = p + v * self.vision;
        let near = p + v * (self.vision * NEAR_LOOKAHEAD);

        let mut push = Vec2::ZERO;
        let mut hits = 0;
        for obstacle in &self.obstacles {
            let ahead = if Self::inside(obstacle, near) {
                near
            } else if Self::inside(obstacle, far) {
                far
            } else {
                continue;
            };
            push += (ahead - obstacle.center) * self.gain;
            hits += 1;
        }

        if hits == 0 {
            return RuleOutput::NONE;
        }
        RuleOutput::new(ctx.clamp(push), hits)
    }
}
