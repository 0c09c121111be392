//! `fl-core`: foundational types for the `rust_flock` swarm controller.
//!
//! This crate is a dependency of every other `fl-*` crate.  It intentionally
//! has no `fl-*` dependencies and minimal external ones (`rand`, `thiserror`,
//! `serde`, `serde_json`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                                  |
//! | [`geo`]         | `Vec2`, distance, speed clamp, angle wrap, weighted sum    |
//! | [`time`]        | `Tick`, `TickClock`                                        |
//! | [`rng`]         | `AgentRng` (per-agent), `SimRng` (global)                  |
//! | [`robot`]       | `RobotKind`, `Footprint`                                   |
//! | [`config`]      | `FlockConfig`, `Arena`, `Obstacle`                         |
//! | [`error`]       | `FlockError`, `FlockResult`                                |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod robot;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{Arena, FlockConfig, Obstacle};
pub use error::{FlockError, FlockResult};
pub use geo::{
    Vec2, clamp_scalar, clamp_speed, distance, normalize_angle_diff, round_precise,
    weighted_sum,
};
pub use ids::AgentId;
pub use rng::{AgentRng, SimRng};
pub use robot::{Footprint, RobotKind};
pub use time::{Tick, TickClock};
