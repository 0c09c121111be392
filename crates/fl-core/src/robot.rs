//! Robot platform kinds and body geometry.
//!
//! The swarm mixes two drive platforms.  Only their footprint matters to the
//! core; everything else about the hardware lives behind the actuation and
//! positioning collaborators.

use serde::{Deserialize, Serialize};

/// Rectangular body footprint in metres.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub width:  f64,
    pub height: f64,
}

impl Footprint {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Radius of the circle enclosing the footprint, `0.5 * sqrt(w² + h²)`.
    #[inline]
    pub fn bounding_radius(self) -> f64 {
        0.5 * self.width.hypot(self.height)
    }
}

/// The drive platform of a robot.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotKind {
    /// Four-wheeled tank-drive rover.
    #[default]
    Rover,
    /// Spherical self-balancing drive robot.
    Sphere,
}

impl RobotKind {
    /// Body footprint of the stock platform.
    pub fn footprint(self) -> Footprint {
        match self {
            RobotKind::Rover  => Footprint::new(0.216, 0.185),
            RobotKind::Sphere => Footprint::new(0.073, 0.073),
        }
    }

    /// Human-readable label, used in CSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            RobotKind::Rover  => "rover",
            RobotKind::Sphere => "sphere",
        }
    }
}

impl std::fmt::Display for RobotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
