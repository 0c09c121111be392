//! Proportional heading controller.

use fl_core::{FlockConfig, Vec2, clamp_scalar, normalize_angle_diff, round_precise};

/// Result of one [`HeadingController::steer`] call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SteerOutput {
    /// rad per tick, within the configured angular bounds.
    pub angular_velocity: f64,
    /// m/s, at most the configured maximum.
    pub linear_velocity:  f64,
    /// Wrapped heading error that produced the command.
    pub angle_diff:       f64,
}

/// Turns a desired velocity vector into linear and angular speed.
///
/// ```text
/// diff     = wrap(atan2(vy, vx) - heading)
/// angular  = clamp(gain * diff, min_angular, max_angular)
/// linear   = max_linear / (deg(|diff|) / slowdown + 1)   if |diff| > threshold
///          = max_linear                                  otherwise
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeadingController {
    pub gain:           f64,
    pub angular_bounds: (f64, f64),
    pub max_linear:     f64,
    pub turn_threshold: f64,
    pub slowdown_deg:   f64,
}

impl HeadingController {
    pub fn from_config(config: &FlockConfig) -> Self {
        Self {
            gain:           config.heading_gain,
            angular_bounds: config.angular_bounds(),
            max_linear:     config.max_linear_speed,
            turn_threshold: config.turn_threshold,
            slowdown_deg:   config.turn_slowdown_deg,
        }
    }

    pub fn steer(&self, heading: f64, velocity: Vec2) -> SteerOutput {
        let desired = velocity.angle();
        let diff = normalize_angle_diff(desired - heading);
        let (min, max) = self.angular_bounds;
        let angular_velocity = clamp_scalar(self.gain * diff, min, max);

        let linear_velocity = if diff.abs() > self.turn_threshold {
            round_precise(self.max_linear / (diff.abs().to_degrees() / self.slowdown_deg + 1.0))
        } else {
            self.max_linear
        };

        SteerOutput { angular_velocity, linear_velocity, angle_diff: diff }
    }
}
