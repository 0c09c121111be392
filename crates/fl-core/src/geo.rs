//! Planar vector type and the flocking vector math.
//!
//! Arena coordinates are metres in an `f64` plane with the origin at one
//! corner of the arena.  Every helper here rounds its result to
//! [`PRECISION_DIGITS`] decimal places so that runs on different platforms
//! produce identical trajectories; tests and log diffs rely on that.

use serde::{Deserialize, Serialize};

use crate::{FlockError, FlockResult};

/// Decimal digits kept by every rounding helper.
pub const PRECISION_DIGITS: i32 = 5;

/// Round `v` to [`PRECISION_DIGITS`] decimal places.
#[inline]
pub fn round_precise(v: f64) -> f64 {
    let scale = 10f64.powi(PRECISION_DIGITS);
    (v * scale).round() / scale
}

// ── Vec2 ──────────────────────────────────────────────────────────────────────

/// A 2-D point or vector in arena coordinates.
///
/// Positions, velocities, and steering forces all share this type.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of length `magnitude` pointing along `angle` (radians from +x).
    #[inline]
    pub fn from_angle(angle: f64, magnitude: f64) -> Self {
        Self::new(magnitude * angle.cos(), magnitude * angle.sin())
    }

    #[inline]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Heading of this vector, `atan2(y, x)`.
    #[inline]
    pub fn angle(self) -> f64 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Both components rounded to [`PRECISION_DIGITS`].
    #[inline]
    pub fn rounded(self) -> Self {
        Self::new(round_precise(self.x), round_precise(self.y))
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.x, self.y)
    }
}

// ── Flocking math ─────────────────────────────────────────────────────────────

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    round_precise((a - b).magnitude())
}

/// Rescale `v` so its magnitude lies in `[min_mag, max_mag]`.
///
/// Direction is preserved.  A zero vector is returned unchanged: inflating it
/// to `min_mag` would invent a direction out of rounding noise.
pub fn clamp_speed(v: Vec2, min_mag: f64, max_mag: f64) -> Vec2 {
    let mag = v.magnitude();
    if mag == 0.0 {
        return Vec2::ZERO;
    }
    let scaled = if mag > max_mag {
        v * (max_mag / mag)
    } else if mag < min_mag {
        v * (min_mag / mag)
    } else {
        v
    };
    scaled.rounded()
}

/// Clamp a scalar into `[min, max]` and round it.
#[inline]
pub fn clamp_scalar(v: f64, min: f64, max: f64) -> f64 {
    round_precise(v.max(min).min(max))
}

/// Wrap an angle difference into `(-π, π]`.
#[inline]
pub fn normalize_angle_diff(diff: f64) -> f64 {
    round_precise(diff.sin().atan2(diff.cos()))
}

/// Element-wise `Σ weights[i] · vectors[i]`.
///
/// # Errors
///
/// [`FlockError::Argument`] if the two slices differ in length.
pub fn weighted_sum(vectors: &[Vec2], weights: &[f64]) -> FlockResult<Vec2> {
    if vectors.len() != weights.len() {
        return Err(FlockError::Argument {
            what:     "weights",
            expected: vectors.len(),
            got:      weights.len(),
        });
    }
    let sum = vectors
        .iter()
        .zip(weights)
        .fold(Vec2::ZERO, |acc, (&v, &w)| acc + v * w);
    Ok(sum.rounded())
}
