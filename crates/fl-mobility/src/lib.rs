//! `fl-mobility`: from steering vector to wheels, and from sensors to position.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`controller`] | `HeadingController`: velocity vector → linear/angular speed  |
//! | [`actuator`]   | `Actuation` trait, `DriveCommand`, recording/null actuators    |
//! | [`position`]   | `PositionSource` trait, `FixedPosition`                       |
//! | [`locator`]    | `LocatorFeed`, `LocatorSource`: external tracking feeds      |
//! | [`error`]      | `ActuationError`, `ActuationResult<T>`                        |
//!
//! # Drive model
//!
//! Robots are commanded with a forward speed and a target heading.  The
//! controller turns a desired velocity vector into an angular velocity
//! proportional to the heading error, and slows the robot down while the
//! error is large so it turns on the spot rather than sweeping a wide arc.

pub mod actuator;
pub mod controller;
pub mod error;
pub mod locator;
pub mod position;


pub use actuator::{Actuation, ActuatorEvent, DriveCommand, NullActuator, RecordingActuator};
pub use controller::{HeadingController, SteerOutput};
pub use error::{ActuationError, ActuationResult};
pub use locator::{Frame, LocatorFeed, LocatorSource};
pub use position::{FixedPosition, PositionSource};
