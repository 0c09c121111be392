//! Swarm-wide configuration.
//!
//! Loaded once at startup from the experiment's JSON file.  Keys use the
//! upper-case names the lab's experiment files have always used
//! (`"ALIGNMENT_WEIGHT"`, `"ARENA_WIDTH"`, …).  Every rule weight, rule range,
//! speed bound and arena dimension is required; a missing or invalid value
//! is a fatal startup error so no robot ever runs with a partial rule set.
//!
//! ```json
//! {
//!   "ALIGNMENT_WEIGHT": 1.0, "COHESION_WEIGHT": 1.0,
//!   "SEPARATION_WEIGHT": 1.0, "WALL_AVOIDANCE_WEIGHT": 1.0,
//!   "ALIGNMENT_RANGE": 1.0, "COHESION_RANGE": 1.0,
//!   "SEPARATION_RANGE": 0.4, "WALL_AVOIDANCE_RANGE": 0.5,
//!   "MIN_LINEAR_SPEED": 0.05, "MAX_LINEAR_SPEED": 0.3,
//!   "MIN_ANGULAR_SPEED": -0.9, "MAX_ANGULAR_SPEED": 0.9,
//!   "ARENA_WIDTH": 4.0, "ARENA_LENGTH": 4.0,
//!   "TICK_PERIOD_MS": 50, "MAX_STOP_TIME": 120
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geo::Vec2;
use crate::time::ticks_for_secs;
use crate::{FlockError, FlockResult};

// ── Arena ─────────────────────────────────────────────────────────────────────

/// Rectangular arena `[0, width] × [0, length]`, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width:  f64,
    pub length: f64,
}

impl Arena {
    #[inline]
    pub const fn new(width: f64, length: f64) -> Self {
        Self { width, length }
    }

    /// `true` if `p` lies inside or on the boundary.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        (0.0..=self.width).contains(&p.x) && (0.0..=self.length).contains(&p.y)
    }
}

// ── Obstacle ──────────────────────────────────────────────────────────────────

/// A static axis-aligned obstacle inside the arena.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center:      Vec2,
    /// Half the obstacle's extent along each axis.
    pub half_extent: Vec2,
}

// ── FlockConfig ───────────────────────────────────────────────────────────────

fn default_tick_period_ms() -> u64 { 50 }
fn default_heading_gain() -> f64 { 5.0 }
fn default_turn_threshold() -> f64 { 0.05 }
fn default_turn_slowdown_deg() -> f64 { 20.0 }
fn default_startup_timeout_ms() -> u64 { 5_000 }
fn default_obstacle_vision() -> f64 { 1.0 }
fn default_unit() -> f64 { 1.0 }

/// Every tunable of the flocking controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FlockConfig {
    // ── Rule weights (dimensionless, typically 0–2) ───────────────────────
    pub alignment_weight:      f64,
    pub cohesion_weight:       f64,
    pub separation_weight:     f64,
    pub wall_avoidance_weight: f64,

    // ── Rule sensing ranges (metres) ──────────────────────────────────────
    pub alignment_range:       f64,
    pub cohesion_range:        f64,
    pub separation_range:      f64,
    pub wall_avoidance_range:  f64,

    // ── Speed bounds ──────────────────────────────────────────────────────
    /// m/s
    pub min_linear_speed:      f64,
    /// m/s
    pub max_linear_speed:      f64,
    /// rad/s; normally negative (full turn in the other direction).
    pub min_angular_speed:     f64,
    /// rad/s
    pub max_angular_speed:     f64,

    // ── Arena ─────────────────────────────────────────────────────────────
    pub arena_width:           f64,
    pub arena_length:          f64,

    // ── Loop timing ───────────────────────────────────────────────────────
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms:        u64,

    /// Hard cap on the number of ticks an agent runs.
    #[serde(default)]
    pub max_ticks:             Option<u64>,

    /// Run length cap in seconds; converted to ticks when `max_ticks` is unset.
    #[serde(default)]
    pub max_stop_time:         Option<f64>,

    /// How long an agent waits for its collaborators before giving up.
    #[serde(default = "default_startup_timeout_ms")]
    pub startup_timeout_ms:    u64,

    // ── Heading controller ────────────────────────────────────────────────
    /// Proportional gain from heading error to angular velocity.
    #[serde(default = "default_heading_gain")]
    pub heading_gain:          f64,

    /// Heading error (rad) above which the robot slows into the turn.
    #[serde(default = "default_turn_threshold")]
    pub turn_threshold:        f64,

    /// Degrees of heading error that halve the linear speed.
    #[serde(default = "default_turn_slowdown_deg")]
    pub turn_slowdown_deg:     f64,

    /// Wrap the heading accumulator into (-π, π] at integration time.
    #[serde(default)]
    pub wrap_heading:          bool,

    /// Divide the angular bounds by ticks-per-second so one tick's heading
    /// increment matches the configured rad/s.
    #[serde(default)]
    pub scale_angular_to_tick: bool,

    // ── Optional obstacle avoidance ───────────────────────────────────────
    #[serde(default)]
    pub obstacles:                 Vec<Obstacle>,
    /// Look-ahead multiplier applied to the velocity vector.
    #[serde(default = "default_obstacle_vision")]
    pub obstacle_vision:           f64,
    #[serde(default = "default_unit")]
    pub obstacle_avoid_gain:       f64,
    #[serde(default = "default_unit")]
    pub obstacle_avoidance_weight: f64,
}

impl FlockConfig {
    /// The parameter set used for lab runs with rovers in a 4 m × 4 m arena.
    pub fn reference() -> Self {
        Self {
            alignment_weight:          1.0,
            cohesion_weight:           1.0,
            separation_weight:         1.0,
            wall_avoidance_weight:     1.0,
            alignment_range:           1.0,
            cohesion_range:            1.0,
            separation_range:          0.4,
            wall_avoidance_range:      0.5,
            min_linear_speed:          0.05,
            max_linear_speed:          0.3,
            min_angular_speed:         -0.9,
            max_angular_speed:         0.9,
            arena_width:               4.0,
            arena_length:              4.0,
            tick_period_ms:            default_tick_period_ms(),
            max_ticks:                 None,
            max_stop_time:             None,
            startup_timeout_ms:        default_startup_timeout_ms(),
            heading_gain:              default_heading_gain(),
            turn_threshold:            default_turn_threshold(),
            turn_slowdown_deg:         default_turn_slowdown_deg(),
            wrap_heading:              false,
            scale_angular_to_tick:     false,
            obstacles:                 Vec::new(),
            obstacle_vision:           default_obstacle_vision(),
            obstacle_avoid_gain:       default_unit(),
            obstacle_avoidance_weight: default_unit(),
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> FlockResult<Self> {
        let config: FlockConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a JSON file.
    pub fn load_json(path: &Path) -> FlockResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> FlockResult<()> {
        let finite = [
            ("ALIGNMENT_WEIGHT", self.alignment_weight),
            ("COHESION_WEIGHT", self.cohesion_weight),
            ("SEPARATION_WEIGHT", self.separation_weight),
            ("WALL_AVOIDANCE_WEIGHT", self.wall_avoidance_weight),
            ("MIN_ANGULAR_SPEED", self.min_angular_speed),
            ("MAX_ANGULAR_SPEED", self.max_angular_speed),
            ("HEADING_GAIN", self.heading_gain),
            ("OBSTACLE_AVOID_GAIN", self.obstacle_avoid_gain),
            ("OBSTACLE_AVOIDANCE_WEIGHT", self.obstacle_avoidance_weight),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(FlockError::Config(format!("{name} must be finite, got {value}")));
            }
        }

        let non_negative = [
            ("ALIGNMENT_RANGE", self.alignment_range),
            ("COHESION_RANGE", self.cohesion_range),
            ("SEPARATION_RANGE", self.separation_range),
            ("WALL_AVOIDANCE_RANGE", self.wall_avoidance_range),
            ("MIN_LINEAR_SPEED", self.min_linear_speed),
            ("TURN_THRESHOLD", self.turn_threshold),
            ("OBSTACLE_VISION", self.obstacle_vision),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(FlockError::Config(format!("{name} must be >= 0, got {value}")));
            }
        }

        let positive = [
            ("MAX_LINEAR_SPEED", self.max_linear_speed),
            ("ARENA_WIDTH", self.arena_width),
            ("ARENA_LENGTH", self.arena_length),
            ("TURN_SLOWDOWN_DEG", self.turn_slowdown_deg),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(FlockError::Config(format!("{name} must be > 0, got {value}")));
            }
        }

        if self.min_linear_speed > self.max_linear_speed {
            return Err(FlockError::Config(format!(
                "MIN_LINEAR_SPEED ({}) exceeds MAX_LINEAR_SPEED ({})",
                self.min_linear_speed, self.max_linear_speed
            )));
        }
        if self.min_angular_speed > self.max_angular_speed {
            return Err(FlockError::Config(format!(
                "MIN_ANGULAR_SPEED ({}) exceeds MAX_ANGULAR_SPEED ({})",
                self.min_angular_speed, self.max_angular_speed
            )));
        }
        if self.tick_period_ms == 0 {
            return Err(FlockError::Config("TICK_PERIOD_MS must be > 0".into()));
        }
        if let Some(secs) = self.max_stop_time {
            if !secs.is_finite() || secs < 0.0 {
                return Err(FlockError::Config(format!("MAX_STOP_TIME must be >= 0, got {secs}")));
            }
        }
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            let h = obstacle.half_extent;
            if !obstacle.center.is_finite() || !h.is_finite() || h.x < 0.0 || h.y < 0.0 {
                return Err(FlockError::Config(format!("obstacle {i} has invalid geometry")));
            }
        }
        Ok(())
    }

    // ── Derived values ────────────────────────────────────────────────────

    #[inline]
    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_length)
    }

    #[inline]
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    #[inline]
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    /// Ticks an agent runs before terminating on its own, if capped.
    ///
    /// `MAX_TICKS` wins over `MAX_STOP_TIME` when both are present.
    pub fn tick_limit(&self) -> Option<u64> {
        self.max_ticks
            .or_else(|| self.max_stop_time.map(|secs| ticks_for_secs(self.tick_period(), secs)))
    }

    /// Wall-avoidance push, `1.5 × WALL_AVOIDANCE_WEIGHT`.
    #[inline]
    pub fn turn_factor(&self) -> f64 {
        1.5 * self.wall_avoidance_weight
    }

    /// Effective `(min, max)` angular velocity for one tick.
    pub fn angular_bounds(&self) -> (f64, f64) {
        if self.scale_angular_to_tick {
            let ticks_per_sec = 1_000.0 / self.tick_period_ms as f64;
            (self.min_angular_speed / ticks_per_sec, self.max_angular_speed / ticks_per_sec)
        } else {
            (self.min_angular_speed, self.max_angular_speed)
        }
    }
}
