//! Unit tests for fl-agent.

use fl_comms::{BusEndpoint, InMemoryBus};
use fl_core::{AgentId, FlockConfig, Vec2};
use fl_mobility::{PositionSource, RecordingActuator};

use crate::{Agent, AgentBuilder, AgentObserver, Lifecycle, RunSummary, TickReport};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Plays back a fixed list of fixes, then repeats the last one.
struct Script {
    fixes: Vec<Option<Vec2>>,
    next:  usize,
}

impl Script {
    fn new(fixes: Vec<Option<Vec2>>) -> Self {
        Self { fixes, next: 0 }
    }
}

impl PositionSource for Script {
    fn get_position(&mut self, _agent: AgentId) -> Option<Vec2> {
        let i = self.next.min(self.fixes.len().saturating_sub(1));
        self.next += 1;
        self.fixes.get(i).copied().flatten()
    }
}

/// Works for `ok_ticks` calls, then panics.
struct PanicAfter {
    ok_ticks: usize,
    calls:    usize,
}

impl PositionSource for PanicAfter {
    fn get_position(&mut self, _agent: AgentId) -> Option<Vec2> {
        self.calls += 1;
        if self.calls > self.ok_ticks {
            panic!("locator driver crashed");
        }
        Some(Vec2::new(2.0, 2.0))
    }
}

struct NeverReady;

impl PositionSource for NeverReady {
    fn get_position(&mut self, _agent: AgentId) -> Option<Vec2> {
        None
    }
    fn is_ready(&self) -> bool {
        false
    }
}

#[derive(Default)]
struct Collect {
    states:  Vec<Lifecycle>,
    reports: Vec<TickReport>,
    summary: Option<RunSummary>,
}

impl AgentObserver for Collect {
    fn on_state_change(&mut self, _agent: AgentId, state: Lifecycle) {
        self.states.push(state);
    }
    fn on_tick_end(&mut self, report: &TickReport) {
        self.reports.push(report.clone());
    }
    fn on_stopped(&mut self, summary: &RunSummary) {
        self.summary = Some(summary.clone());
    }
}

fn fast_config(max_ticks: Option<u64>) -> FlockConfig {
    FlockConfig { tick_period_ms: 1, max_ticks, ..FlockConfig::reference() }
}

fn agent_at<P: PositionSource>(
    id: u32,
    config: &FlockConfig,
    bus: &InMemoryBus,
    start: Vec2,
    heading: f64,
    position: P,
    actuator: RecordingActuator,
) -> Agent<P, BusEndpoint, RecordingActuator> {
    AgentBuilder::new(AgentId(id), config)
        .start(start, heading)
        .build(position, bus.subscribe(AgentId(id)).unwrap(), actuator)
}

// ── NeighborTable ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod neighbors {
    use fl_core::Tick;

    use super::*;
    use crate::NeighborTable;

    #[test]
    fn last_write_wins_and_snapshot_is_sorted() {
        let mut t = NeighborTable::new();
        t.upsert(AgentId(5), Vec2::new(1.0, 1.0), Vec2::ZERO, Tick(0));
        t.upsert(AgentId(2), Vec2::new(2.0, 2.0), Vec2::ZERO, Tick(0));
        t.upsert(AgentId(5), Vec2::new(3.0, 3.0), Vec2::ZERO, Tick(1));

        assert_eq!(t.len(), 2);
        assert_eq!(t.get(AgentId(5)).map(|e| e.position), Some(Vec2::new(3.0, 3.0)));
        let ids: Vec<AgentId> = t.snapshot().iter().map(|e| e.id).collect();
        assert_eq!(ids, [AgentId(2), AgentId(5)]);
    }

    #[test]
    fn clear_empties() {
        let mut t = NeighborTable::new();
        t.upsert(AgentId(1), Vec2::ZERO, Vec2::ZERO, Tick(0));
        t.clear();
        assert!(t.is_empty());
        assert!(t.snapshot().is_empty());
        assert!(t.get(AgentId(1)).is_none());
    }
}

// ── KinematicState / lifecycle primitives ─────────────────────────────────────

#[cfg(test)]
mod primitives {
    use std::f64::consts::PI;
    use std::thread;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::{KinematicState, StopSignal};

    #[test]
    fn initial_state_moves_at_full_speed_along_heading() {
        let s = KinematicState::initial(Vec2::new(1.0, 1.0), PI / 2.0, &FlockConfig::reference());
        assert!(s.velocity.x.abs() < 1e-5);
        assert!((s.velocity.y - 0.3).abs() < 1e-5);
        assert_eq!(s.linear_velocity, 0.3);
        assert_eq!(s.angular_velocity, 0.0);
    }

    #[test]
    fn stop_signal_times_out_then_fires() {
        let stop = StopSignal::new();
        assert!(!stop.sleep_or_stop(Duration::from_millis(5)));
        stop.request();
        assert!(stop.is_requested());
        assert!(stop.sleep_or_stop(Duration::from_secs(10)));
    }

    #[test]
    fn stop_signal_wakes_sleeper() {
        let stop = StopSignal::new();
        let remote = stop.clone();
        let started = Instant::now();
        let waker = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.request();
        });
        assert!(stop.sleep_or_stop(Duration::from_secs(10)));
        assert!(started.elapsed() < Duration::from_secs(5));
        waker.join().unwrap();
    }
}

// ── Single ticks ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick {
    use std::f64::consts::PI;

    use fl_comms::{CommunicationChannel, PeerState};
    use fl_mobility::{ActuatorEvent, FixedPosition};

    use super::*;
    use crate::AgentError;

    #[test]
    fn lone_agent_keeps_course() {
        let config = fast_config(None);
        let bus = InMemoryBus::new();
        let act = RecordingActuator::new();
        let centre = Vec2::new(2.0, 2.0);
        let mut agent = agent_at(1, &config, &bus, centre, 0.0, FixedPosition(centre), act.clone());

        let report = agent.tick().unwrap();
        assert_eq!(report.neighbors, 0);
        assert_eq!(report.force, Vec2::ZERO);
        assert_eq!(report.state.velocity, Vec2::new(0.3, 0.0));
        assert_eq!(report.command.linear_velocity, 0.3);
        assert_eq!(report.command.angular_velocity, 0.0);
        assert_eq!(act.drives(), vec![report.command]);
        assert_eq!(agent.tick_count().0, 1);
    }

    #[test]
    fn cohesion_turns_toward_peer() {
        let config = FlockConfig {
            alignment_weight: 0.0,
            separation_weight: 0.0,
            cohesion_range: 5.0,
            arena_width: 10.0,
            arena_length: 10.0,
            ..fast_config(None)
        };
        let bus = InMemoryBus::new();
        let me = Vec2::new(5.0, 5.0);
        let mut agent =
            agent_at(1, &config, &bus, me, PI / 2.0, FixedPosition(me), RecordingActuator::new());
        let mut peer = bus.subscribe(AgentId(2)).unwrap();
        peer.broadcast(&PeerState::new(AgentId(2), Vec2::new(8.0, 5.0), Vec2::ZERO)).unwrap();

        let report = agent.tick().unwrap();
        assert_eq!(report.neighbors, 1);
        let cohesion = report.outcomes.iter().find(|o| o.rule == "cohesion").unwrap();
        assert_eq!(cohesion.output.contributors, 1);
        assert!((report.force.x - 0.3).abs() < 1e-5);
        assert!(report.state.velocity.x > 0.0);
        assert!(report.state.angular_velocity < 0.0, "should turn toward +x");
        // the peer hears us
        assert_eq!(peer.poll_latest().len(), 1);
    }

    #[test]
    fn neighbor_view_is_per_tick() {
        let config = fast_config(None);
        let bus = InMemoryBus::new();
        let me = Vec2::new(2.0, 2.0);
        let mut agent =
            agent_at(1, &config, &bus, me, 0.0, FixedPosition(me), RecordingActuator::new());
        let mut peer = bus.subscribe(AgentId(2)).unwrap();

        peer.broadcast(&PeerState::new(AgentId(2), Vec2::new(2.3, 2.0), Vec2::new(0.3, 0.0))).unwrap();
        assert_eq!(agent.tick().unwrap().neighbors, 1);
        assert!(agent.neighbors().get(AgentId(2)).is_some());

        assert_eq!(agent.tick().unwrap().neighbors, 0);
        assert!(agent.neighbors().is_empty());
    }

    #[test]
    fn own_echo_is_ignored() {
        let config = fast_config(None);
        let bus = InMemoryBus::new();
        let me = Vec2::new(2.0, 2.0);
        let mut agent =
            agent_at(1, &config, &bus, me, 0.0, FixedPosition(me), RecordingActuator::new());
        bus.deliver(AgentId(1), 99, PeerState::new(AgentId(1), me, Vec2::ZERO)).unwrap();
        assert_eq!(agent.tick().unwrap().neighbors, 0);
    }

    #[test]
    fn missing_fix_keeps_previous_position() {
        let config = fast_config(None);
        let bus = InMemoryBus::new();
        let start = Vec2::new(1.0, 1.5);
        let script = Script::new(vec![None, Some(Vec2::new(1.2, 1.5)), None]);
        let mut agent = agent_at(1, &config, &bus, start, 0.0, script, RecordingActuator::new());

        let first = agent.tick().unwrap();
        assert!(!first.position_fresh);
        assert_eq!(first.state.position, start);

        let second = agent.tick().unwrap();
        assert!(second.position_fresh);
        assert_eq!(second.state.position, Vec2::new(1.2, 1.5));

        let third = agent.tick().unwrap();
        assert!(!third.position_fresh);
        assert_eq!(third.state.position, Vec2::new(1.2, 1.5));
    }

    #[test]
    fn failed_tick_commits_nothing() {
        let config = fast_config(None);
        let bus = InMemoryBus::new();
        let act = RecordingActuator::failing_after(1);
        let script = Script::new(vec![Some(Vec2::new(0.1, 0.1)), Some(Vec2::new(0.2, 0.2))]);
        let mut agent = agent_at(1, &config, &bus, Vec2::new(0.1, 0.1), 0.0, script, act.clone());

        agent.tick().unwrap();
        let before = *agent.state();

        let err = agent.tick().unwrap_err();
        assert!(matches!(err, AgentError::Actuation(_)));
        assert_eq!(*agent.state(), before);
        assert_eq!(agent.tick_count().0, 1);
        assert_eq!(act.events().iter().filter(|e| matches!(e, ActuatorEvent::Drive(_))).count(), 1);
    }

    #[test]
    fn heading_accumulates_and_can_wrap() {
        let me = Vec2::new(2.0, 2.0);
        for wrap in [false, true] {
            let config = FlockConfig { wrap_heading: wrap, ..fast_config(None) };
            let bus = InMemoryBus::new();
            let mut agent =
                agent_at(1, &config, &bus, me, 3.1, FixedPosition(me), RecordingActuator::new());
            agent.state.angular_velocity = 0.9;
            let report = agent.tick().unwrap();
            if wrap {
                assert!(report.state.heading < 0.0 && report.state.heading > -std::f64::consts::PI);
            } else {
                assert!((report.state.heading - 4.0).abs() < 1e-9);
            }
            let yaw = report.command.yaw_degrees();
            assert!(yaw > -180 && yaw <= 180);
        }
    }
}

// ── Full runs ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use std::thread;
    use std::time::Duration;

    use fl_mobility::FixedPosition;

    use super::*;
    use crate::{NoopObserver, StopReason};

    #[test]
    fn runs_to_tick_limit_and_stops_once() {
        let config = fast_config(Some(5));
        let bus = InMemoryBus::new();
        let act = RecordingActuator::new();
        let me = Vec2::new(2.0, 2.0);
        let mut agent = agent_at(1, &config, &bus, me, 0.0, FixedPosition(me), act.clone());
        let mut obs = Collect::default();

        let summary = agent.run(&mut obs);

        assert_eq!(summary.reason, StopReason::MaxTicks);
        assert_eq!(summary.ticks, 5);
        assert_eq!(obs.reports.len(), 5);
        assert_eq!(
            obs.states,
            [Lifecycle::Initializing, Lifecycle::Running, Lifecycle::Terminating, Lifecycle::Stopped]
        );
        assert_eq!(obs.summary.as_ref(), Some(&summary));
        assert_eq!(act.drives().len(), 5);
        assert_eq!(act.stop_count(), 1);
        assert_eq!(agent.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn tick_fault_terminates_with_stop() {
        let config = fast_config(Some(10));
        let bus = InMemoryBus::new();
        let act = RecordingActuator::failing_after(2);
        let me = Vec2::new(2.0, 2.0);
        let mut agent = agent_at(1, &config, &bus, me, 0.0, FixedPosition(me), act.clone());

        let summary = agent.run(&mut NoopObserver);

        assert!(summary.reason.is_fault());
        assert_eq!(summary.ticks, 2);
        assert_eq!(act.stop_count(), 1);
    }

    #[test]
    fn panic_is_contained() {
        let config = fast_config(Some(10));
        let bus = InMemoryBus::new();
        let act = RecordingActuator::new();
        let source = PanicAfter { ok_ticks: 1, calls: 0 };
        let mut agent = agent_at(1, &config, &bus, Vec2::new(2.0, 2.0), 0.0, source, act.clone());

        let summary = agent.run(&mut NoopObserver);

        match &summary.reason {
            StopReason::Fault(msg) => assert!(msg.contains("locator driver crashed"), "{msg}"),
            other => panic!("unexpected reason {other:?}"),
        }
        assert_eq!(summary.ticks, 1);
        assert_eq!(act.stop_count(), 1);
    }

    /// Records ticks like `Collect`, then panics on tick `panic_on`.
    struct CrashingObserver {
        inner:    Collect,
        panic_on: usize,
    }

    impl AgentObserver for CrashingObserver {
        fn on_state_change(&mut self, agent: AgentId, state: Lifecycle) {
            self.inner.on_state_change(agent, state);
        }
        fn on_tick_end(&mut self, report: &TickReport) {
            if self.inner.reports.len() + 1 == self.panic_on {
                panic!("telemetry sink gone");
            }
            self.inner.on_tick_end(report);
        }
        fn on_stopped(&mut self, summary: &RunSummary) {
            self.inner.on_stopped(summary);
        }
    }

    /// Panics on every lifecycle callback.
    struct LoudObserver;

    impl AgentObserver for LoudObserver {
        fn on_state_change(&mut self, _agent: AgentId, state: Lifecycle) {
            panic!("cannot render {state}");
        }
        fn on_stopped(&mut self, _summary: &RunSummary) {
            panic!("cannot render summary");
        }
    }

    #[test]
    fn observer_panic_on_tick_still_stops_robot() {
        let config = fast_config(Some(10));
        let bus = InMemoryBus::new();
        let act = RecordingActuator::new();
        let me = Vec2::new(2.0, 2.0);
        let mut agent = agent_at(1, &config, &bus, me, 0.0, FixedPosition(me), act.clone());
        let mut obs = CrashingObserver { inner: Collect::default(), panic_on: 3 };

        let summary = agent.run(&mut obs);

        match &summary.reason {
            StopReason::Fault(msg) => assert!(msg.contains("telemetry sink gone"), "{msg}"),
            other => panic!("unexpected reason {other:?}"),
        }
        assert_eq!(summary.ticks, 3);
        assert_eq!(obs.inner.reports.len(), 2);
        assert_eq!(act.stop_count(), 1);
        assert_eq!(agent.lifecycle(), Lifecycle::Stopped);
        assert_eq!(obs.inner.states.last(), Some(&Lifecycle::Stopped));
        assert_eq!(obs.inner.summary.as_ref(), Some(&summary));
    }

    #[test]
    fn observer_panic_on_lifecycle_is_logged_not_fatal() {
        let config = fast_config(Some(3));
        let bus = InMemoryBus::new();
        let act = RecordingActuator::new();
        let me = Vec2::new(2.0, 2.0);
        let mut agent = agent_at(1, &config, &bus, me, 0.0, FixedPosition(me), act.clone());

        let summary = agent.run(&mut LoudObserver);

        assert_eq!(summary.reason, StopReason::MaxTicks);
        assert_eq!(summary.ticks, 3);
        assert_eq!(act.stop_count(), 1);
        assert_eq!(agent.lifecycle(), Lifecycle::Stopped);
    }

    #[test]
    fn never_ready_gives_up() {
        let config = FlockConfig { startup_timeout_ms: 20, ..fast_config(Some(10)) };
        let bus = InMemoryBus::new();
        let act = RecordingActuator::new();
        let mut agent = agent_at(1, &config, &bus, Vec2::ZERO, 0.0, NeverReady, act.clone());
        let mut obs = Collect::default();

        let summary = agent.run(&mut obs);

        assert_eq!(summary.reason, StopReason::NotReady);
        assert_eq!(summary.ticks, 0);
        assert!(act.drives().is_empty());
        assert_eq!(act.stop_count(), 1);
        assert_eq!(
            obs.states,
            [Lifecycle::Initializing, Lifecycle::Terminating, Lifecycle::Stopped]
        );
    }

    #[test]
    fn stop_signal_ends_run() {
        let config = FlockConfig { tick_period_ms: 5, ..fast_config(None) };
        let bus = InMemoryBus::new();
        let act = RecordingActuator::new();
        let me = Vec2::new(2.0, 2.0);
        let mut agent = agent_at(1, &config, &bus, me, 0.0, FixedPosition(me), act.clone());
        let stop = agent.stop_signal();

        let handle = thread::spawn(move || agent.run(&mut NoopObserver));
        thread::sleep(Duration::from_millis(40));
        stop.request();
        let summary = handle.join().unwrap();

        assert_eq!(summary.reason, StopReason::Signal);
        assert!(summary.ticks >= 1);
        assert_eq!(act.stop_count(), 1);
    }
}
