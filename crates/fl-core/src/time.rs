//! Control-loop time model.
//!
//! # Design
//!
//! Each agent counts its own ticks with a `Tick` counter; there is no global
//! clock shared between robots.  Wall-clock pacing is handled by
//! [`TickClock`], which schedules tick boundaries as absolute deadlines:
//!
//!   deadline(n) = start + n * period
//!
//! Scheduling against deadlines rather than sleeping a fixed `period` after
//! each tick keeps the cadence from drifting by the tick's own runtime.  When
//! a tick overruns its slot the schedule is re-anchored at "now" instead of
//! firing a burst of catch-up ticks.

use std::fmt;
use std::time::{Duration, Instant};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// A per-agent tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// The tick after `self`.
    #[inline]
    pub fn next(self) -> Tick {
        Tick(self.0 + 1)
    }

    /// Ticks elapsed from `earlier` to `self` (saturating).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

/// How many ticks of `period` fit in `secs` seconds (rounded up).
pub fn ticks_for_secs(period: Duration, secs: f64) -> u64 {
    let period_ms = period.as_millis() as f64;
    if period_ms <= 0.0 || secs <= 0.0 {
        return 0;
    }
    (secs * 1_000.0 / period_ms).ceil() as u64
}

// ── TickClock ─────────────────────────────────────────────────────────────────

/// Deadline scheduler for one agent's control loop.
#[derive(Clone, Debug)]
pub struct TickClock {
    period:        Duration,
    next_deadline: Instant,
    overruns:      u64,
}

impl TickClock {
    /// Start a schedule whose first boundary is one `period` from now.
    pub fn start(period: Duration) -> Self {
        Self {
            period,
            next_deadline: Instant::now() + period,
            overruns: 0,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Number of ticks that finished after their deadline.
    #[inline]
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Time left until the next boundary, then advance the schedule by one
    /// period.
    ///
    /// Returns `Duration::ZERO` when the boundary has already passed; in that
    /// case the schedule restarts from `now`.
    pub fn advance(&mut self) -> Duration {
        let now = Instant::now();
        if now >= self.next_deadline {
            self.overruns += 1;
            self.next_deadline = now + self.period;
            return Duration::ZERO;
        }
        let wait = self.next_deadline - now;
        self.next_deadline += self.period;
        wait
    }
}
