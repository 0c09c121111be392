//! An agent's kinematic state.

use fl_core::{FlockConfig, Vec2, clamp_speed};

/// Everything the control loop carries from one tick to the next.
///
/// `Copy`, so a tick can work on a private copy and commit it in one
/// assignment when the whole tick has succeeded.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KinematicState {
    /// Arena metres.
    pub position:         Vec2,
    /// Heading accumulator, radians.  Unbounded unless `WRAP_HEADING` is set.
    pub heading:          f64,
    /// Desired velocity vector; magnitude stays inside the speed band.
    pub velocity:         Vec2,
    /// m/s
    pub linear_velocity:  f64,
    /// rad per tick
    pub angular_velocity: f64,
}

impl KinematicState {
    /// State of a robot placed at `position`, facing `heading`, about to
    /// move forward at full speed.
    pub fn initial(position: Vec2, heading: f64, config: &FlockConfig) -> Self {
        let max = config.max_linear_speed;
        Self {
            position,
            heading,
            velocity: clamp_speed(Vec2::from_angle(heading, max), config.min_linear_speed, max),
            linear_velocity: max,
            angular_velocity: 0.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.heading.is_finite()
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite()
    }
}
