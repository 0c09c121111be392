//! The per-robot control loop.
//!
//! # Tick
//!
//! ```text
//! position source ─▶ heading += ω ─▶ broadcast ─▶ poll peers ─▶ neighbor table
//!        ─▶ behavior set ─▶ velocity += force (clamped) ─▶ heading controller
//!        ─▶ drive
//! ```
//!
//! A tick works on a copy of the kinematic state and a fresh neighbor table.
//! Both are committed only after the drive command has been accepted, so a
//! failed tick leaves the agent exactly as it was before the tick started.
//!
//! # Run
//!
//! [`Agent::run`] wraps ticks in the lifecycle: wait for collaborators,
//! tick on a fixed cadence until stopped, then always issue a final stop
//! command.  A tick error or panic is caught at the tick boundary and ends
//! only this agent's run.  Observer callbacks are guarded the same way: a
//! panicking observer cannot unwind past the final stop command.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use fl_behavior::{BehaviorSet, OwnState, RuleContext};
use fl_comms::{CommunicationChannel, PeerState};
use fl_core::{
    AgentId, Footprint, RobotKind, Tick, TickClock, clamp_speed, normalize_angle_diff,
    round_precise,
};
use fl_mobility::{Actuation, DriveCommand, HeadingController, PositionSource};
use tracing::{debug, error, info, trace, warn};

use crate::{
    AgentError, AgentObserver, AgentResult, KinematicState, Lifecycle, LifecycleCell,
    NeighborTable, RunSummary, StopReason, StopSignal, TickReport,
};

/// How often readiness is re-checked while waiting for collaborators.
const READY_POLL: Duration = Duration::from_millis(10);

/// One robot's flocking controller.
///
/// Generic over its three collaborators so tests and the simulated world can
/// plug in in-process implementations; the swarm runner uses boxed trait
/// objects.  Construct with [`AgentBuilder`][crate::AgentBuilder].
pub struct Agent<P, C, A> {
    pub(crate) id:              AgentId,
    pub(crate) kind:            RobotKind,
    pub(crate) footprint:       Footprint,

    pub(crate) behaviors:       BehaviorSet,
    pub(crate) controller:      HeadingController,
    pub(crate) speed_limits:    (f64, f64),
    pub(crate) wrap_heading:    bool,
    pub(crate) tick_limit:      Option<u64>,
    pub(crate) tick_period:     Duration,
    pub(crate) startup_timeout: Duration,

    pub(crate) position:        P,
    pub(crate) channel:         C,
    pub(crate) actuator:        A,

    pub(crate) state:           KinematicState,
    pub(crate) neighbors:       NeighborTable,
    pub(crate) tick:            Tick,
    pub(crate) overruns:        u64,

    pub(crate) lifecycle:       LifecycleCell,
    pub(crate) stop:            StopSignal,
}

impl<P, C, A> Agent<P, C, A>
where
    P: PositionSource,
    C: CommunicationChannel,
    A: Actuation,
{
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn kind(&self) -> RobotKind {
        self.kind
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    pub fn state(&self) -> &KinematicState {
        &self.state
    }

    /// The next tick to run; equals the number of ticks completed.
    pub fn tick_count(&self) -> Tick {
        self.tick
    }

    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    pub fn lifecycle_handle(&self) -> LifecycleCell {
        self.lifecycle.clone()
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    // ── One tick ──────────────────────────────────────────────────────────

    /// Run one control tick.
    ///
    /// # Errors
    ///
    /// A behavior error, a rejected drive command, or a non-finite state.
    /// On error nothing is committed.
    pub fn tick(&mut self) -> AgentResult<TickReport> {
        let now = self.tick;
        let mut next = self.state;

        // 1. Own position; keep the previous one when there is no usable fix.
        let position_fresh = match self.position.get_position(self.id) {
            Some(p) if p.is_finite() => {
                next.position = p;
                true
            }
            _ => {
                trace!(agent = %self.id, tick = %now, "no position fix, keeping previous");
                false
            }
        };

        // 2. Integrate last tick's turn rate.
        next.heading = round_precise(next.heading + next.angular_velocity);
        if self.wrap_heading {
            next.heading = normalize_angle_diff(next.heading);
        }

        // 3. Tell the swarm where we are.
        let own = PeerState::new(self.id, next.position, next.velocity);
        if let Err(e) = self.channel.broadcast(&own) {
            warn!(agent = %self.id, tick = %now, error = %e, "broadcast failed");
        }

        // 4. Fresh neighbor view for this tick.
        let mut table = NeighborTable::new();
        for peer in self.channel.poll_latest() {
            if peer.id == self.id || !peer.position.is_finite() || !peer.velocity.is_finite() {
                continue;
            }
            table.upsert(peer.id, peer.position, peer.velocity, now);
        }
        let snapshot = table.snapshot();

        // 5. Rules.
        let ctx = RuleContext::new(
            OwnState { position: next.position, velocity: next.velocity },
            &snapshot,
            self.speed_limits,
        );
        let steering = self.behaviors.evaluate(&ctx)?;

        // 6. Velocity.
        let (min, max) = self.speed_limits;
        next.velocity = clamp_speed(next.velocity + steering.force, min, max);

        // 7–8. Heading control.
        let steer = self.controller.steer(next.heading, next.velocity);
        next.angular_velocity = steer.angular_velocity;
        next.linear_velocity = steer.linear_velocity;

        if !next.is_finite() {
            return Err(AgentError::NonFinite { what: "kinematic state", tick: now });
        }

        // 9. Drive.
        let command = DriveCommand {
            linear_velocity:  next.linear_velocity,
            heading:          next.heading,
            angular_velocity: next.angular_velocity,
        };
        self.actuator.drive(&command)?;

        // Commit.
        self.state = next;
        self.neighbors = table;
        self.tick = now.next();

        debug!(
            agent = %self.id,
            tick = %now,
            neighbors = snapshot.len(),
            force = %steering.force,
            linear = command.linear_velocity,
            angular = command.angular_velocity,
            "tick"
        );

        Ok(TickReport {
            agent: self.id,
            tick: now,
            state: next,
            position_fresh,
            neighbors: snapshot.len(),
            force: steering.force,
            outcomes: steering.outcomes,
            command,
        })
    }

    /// [`tick`](Self::tick) with panics caught.  Returns the fault message on
    /// failure, already logged with agent id and tick.
    pub fn guarded_tick(&mut self) -> Result<TickReport, String> {
        let tick = self.tick;
        match catch_unwind(AssertUnwindSafe(|| self.tick())) {
            Ok(Ok(report)) => Ok(report),
            Ok(Err(e)) => {
                error!(agent = %self.id, tick = %tick, error = %e, "tick failed");
                Err(e.to_string())
            }
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!(agent = %self.id, tick = %tick, panic = %msg, "tick panicked");
                Err(format!("panic: {msg}"))
            }
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// `true` when both the position source and the channel are ready.
    pub fn collaborators_ready(&self) -> bool {
        self.position.is_ready() && self.channel.is_ready()
    }

    pub(crate) fn transition<O: AgentObserver + ?Sized>(&mut self, next: Lifecycle, observer: &mut O) {
        let prev = self.lifecycle.get();
        self.lifecycle.set(next);
        debug!(agent = %self.id, from = %prev, to = %next, "lifecycle");
        let id = self.id;
        let _ = self.notify("on_state_change", || observer.on_state_change(id, next));
    }

    /// Hand a completed tick to `observer`.  A panic in the callback is
    /// logged and returned as a fault message; the caller decides whether
    /// the run ends.
    pub fn report_tick<O: AgentObserver + ?Sized>(
        &self,
        report:   &TickReport,
        observer: &mut O,
    ) -> Result<(), String> {
        self.notify("on_tick_end", || observer.on_tick_end(report))
            .map_err(|msg| format!("observer panic: {msg}"))
    }

    fn notify(&self, callback: &'static str, f: impl FnOnce()) -> Result<(), String> {
        catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
            let msg = panic_message(payload.as_ref());
            error!(agent = %self.id, callback, panic = %msg, "observer panicked");
            msg
        })
    }

    /// Mark the agent `Running` without waiting on its collaborators.
    pub fn activate<O: AgentObserver + ?Sized>(&mut self, observer: &mut O) {
        self.transition(Lifecycle::Running, observer);
    }

    /// `true` once the configured tick limit has been reached.
    pub fn tick_limit_reached(&self) -> bool {
        self.tick_limit.is_some_and(|limit| self.tick.0 >= limit)
    }

    /// Terminate: issue the final stop command and report.
    pub fn shutdown<O: AgentObserver + ?Sized>(&mut self, reason: StopReason, observer: &mut O) -> RunSummary {
        self.transition(Lifecycle::Terminating, observer);
        match catch_unwind(AssertUnwindSafe(|| self.actuator.stop())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(agent = %self.id, error = %e, "stop command failed"),
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                error!(agent = %self.id, panic = %msg, "stop command panicked");
            }
        }
        self.transition(Lifecycle::Stopped, observer);

        let summary = RunSummary {
            agent:       self.id,
            ticks:       self.tick.0,
            reason,
            overruns:    self.overruns,
            final_state: self.state,
        };
        info!(
            agent = %self.id,
            ticks = summary.ticks,
            overruns = summary.overruns,
            reason = %summary.reason,
            "agent stopped"
        );
        let _ = self.notify("on_stopped", || observer.on_stopped(&summary));
        summary
    }

    /// Wait for collaborators, bounded by the startup timeout.
    fn await_ready(&self) -> Result<(), StopReason> {
        let deadline = Instant::now() + self.startup_timeout;
        loop {
            if self.collaborators_ready() {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                warn!(
                    agent = %self.id,
                    timeout_ms = self.startup_timeout.as_millis() as u64,
                    "collaborators not ready"
                );
                return Err(StopReason::NotReady);
            }
            if self.stop.sleep_or_stop(READY_POLL.min(deadline - now)) {
                return Err(StopReason::Signal);
            }
        }
    }

    /// Run the agent to completion on the current thread.
    pub fn run<O: AgentObserver + ?Sized>(&mut self, observer: &mut O) -> RunSummary {
        self.transition(Lifecycle::Initializing, observer);

        let reason = match self.await_ready() {
            Err(reason) => reason,
            Ok(()) => {
                self.activate(observer);
                info!(agent = %self.id, kind = %self.kind, "agent running");
                self.run_ticks(observer)
            }
        };

        self.shutdown(reason, observer)
    }

    fn run_ticks<O: AgentObserver + ?Sized>(&mut self, observer: &mut O) -> StopReason {
        let mut clock = TickClock::start(self.tick_period);
        let reason = loop {
            if self.stop.is_requested() {
                break StopReason::Signal;
            }
            if self.tick_limit_reached() {
                break StopReason::MaxTicks;
            }
            let report = match self.guarded_tick() {
                Ok(report) => report,
                Err(msg) => break StopReason::Fault(msg),
            };
            if let Err(msg) = self.report_tick(&report, observer) {
                break StopReason::Fault(msg);
            }
            if self.tick_limit_reached() {
                break StopReason::MaxTicks;
            }
            let wait = clock.advance();
            if self.stop.sleep_or_stop(wait) {
                break StopReason::Signal;
            }
        };
        self.overruns = clock.overruns();
        reason
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
