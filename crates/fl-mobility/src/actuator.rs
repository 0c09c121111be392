//! The drive interface and two in-process implementations.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::{ActuationError, ActuationResult};

// ── DriveCommand ──────────────────────────────────────────────────────────────

/// One tick's motion command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DriveCommand {
    /// m/s, forward.
    pub linear_velocity:  f64,
    /// Heading accumulator in radians.  May be outside (-π, π].
    pub heading:          f64,
    pub angular_velocity: f64,
}

impl DriveCommand {
    /// Heading as whole yaw degrees in `(-180, 180]`, the range drive
    /// firmware accepts.  Fractional degrees are truncated.
    pub fn yaw_degrees(&self) -> i32 {
        let degrees = self.heading.to_degrees().trunc() as i64;
        let wrapped = degrees.rem_euclid(360);
        (if wrapped > 180 { wrapped - 360 } else { wrapped }) as i32
    }
}

// ── Actuation ─────────────────────────────────────────────────────────────────

/// A robot's drive system.
///
/// Calls are synchronous: an implementation fronting an asynchronous robot
/// SDK blocks (or queues) internally.
pub trait Actuation: Send {
    fn drive(&mut self, command: &DriveCommand) -> ActuationResult<()>;

    /// Bring the robot to rest.  Issued exactly once when an agent stops.
    fn stop(&mut self) -> ActuationResult<()>;
}

impl<T: Actuation + ?Sized> Actuation for Box<T> {
    fn drive(&mut self, command: &DriveCommand) -> ActuationResult<()> {
        (**self).drive(command)
    }

    fn stop(&mut self) -> ActuationResult<()> {
        (**self).stop()
    }
}

// ── NullActuator ──────────────────────────────────────────────────────────────

/// Accepts every command and does nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullActuator;

impl Actuation for NullActuator {
    fn drive(&mut self, _command: &DriveCommand) -> ActuationResult<()> {
        Ok(())
    }

    fn stop(&mut self) -> ActuationResult<()> {
        Ok(())
    }
}

// ── RecordingActuator ─────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ActuatorEvent {
    Drive(DriveCommand),
    Stop,
}

/// Records every command it receives.
///
/// Clones share one log, so a test can keep a handle while the agent owns
/// the other.  Optionally starts failing after a fixed number of drive
/// commands.
#[derive(Clone, Debug, Default)]
pub struct RecordingActuator {
    events:     Arc<Mutex<Vec<ActuatorEvent>>>,
    fail_after: Option<usize>,
}

impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every drive command after the first `drives` succeed.
    pub fn failing_after(drives: usize) -> Self {
        Self { fail_after: Some(drives), ..Self::default() }
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<ActuatorEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn drives(&self) -> Vec<DriveCommand> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ActuatorEvent::Drive(cmd) => Some(cmd),
                ActuatorEvent::Stop => None,
            })
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.events().iter().filter(|e| matches!(e, ActuatorEvent::Stop)).count()
    }
}

impl Actuation for RecordingActuator {
    fn drive(&mut self, command: &DriveCommand) -> ActuationResult<()> {
        let mut events = self.events.lock().map_err(|_| ActuationError::Poisoned)?;
        if let Some(limit) = self.fail_after {
            let driven = events.iter().filter(|e| matches!(e, ActuatorEvent::Drive(_))).count();
            if driven >= limit {
                return Err(ActuationError::Driver(format!("rejected after {limit} commands")));
            }
        }
        debug!(linear = command.linear_velocity, yaw = command.yaw_degrees(), "drive");
        events.push(ActuatorEvent::Drive(*command));
        Ok(())
    }

    fn stop(&mut self) -> ActuationResult<()> {
        self.events.lock().map_err(|_| ActuationError::Poisoned)?.push(ActuatorEvent::Stop);
        Ok(())
    }
}
