//! Agent lifecycle states and the stop signal.
//!
//! Both types are cheap `Arc` handles so a supervisor (the swarm runner, a
//! Ctrl-C handler) can hold a clone while the agent thread owns the other.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

// ── Lifecycle ─────────────────────────────────────────────────────────────────

/// `Initializing → Running → Terminating → Stopped`.
///
/// An agent that never becomes ready goes straight from `Initializing` to
/// `Terminating`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Lifecycle {
    Initializing = 0,
    Running      = 1,
    Terminating  = 2,
    Stopped      = 3,
}

impl Lifecycle {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Lifecycle::Initializing,
            1 => Lifecycle::Running,
            2 => Lifecycle::Terminating,
            _ => Lifecycle::Stopped,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Lifecycle::Initializing => "initializing",
            Lifecycle::Running => "running",
            Lifecycle::Terminating => "terminating",
            Lifecycle::Stopped => "stopped",
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, lock-free view of one agent's [`Lifecycle`].
#[derive(Clone, Debug)]
pub struct LifecycleCell(Arc<AtomicU8>);

impl Default for LifecycleCell {
    fn default() -> Self {
        Self(Arc::new(AtomicU8::new(Lifecycle::Initializing as u8)))
    }
}

impl LifecycleCell {
    pub fn get(&self) -> Lifecycle {
        Lifecycle::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: Lifecycle) {
        self.0.store(state as u8, Ordering::Release);
    }
}

// ── StopSignal ────────────────────────────────────────────────────────────────

/// One-shot stop request that also wakes a sleeping agent.
#[derive(Clone, Debug, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this signal to stop.  Idempotent.
    pub fn request(&self) {
        let (flag, wake) = &*self.inner;
        if let Ok(mut requested) = flag.lock() {
            *requested = true;
        }
        wake.notify_all();
    }

    pub fn is_requested(&self) -> bool {
        self.inner.0.lock().map(|r| *r).unwrap_or(true)
    }

    /// Sleep for up to `timeout`, returning early (with `true`) as soon as a
    /// stop is requested.
    pub fn sleep_or_stop(&self, timeout: Duration) -> bool {
        let (flag, wake) = &*self.inner;
        let Ok(guard) = flag.lock() else {
            return true;
        };
        if *guard || timeout.is_zero() {
            return *guard;
        }
        match wake.wait_timeout_while(guard, timeout, |requested| !*requested) {
            Ok((guard, _)) => *guard,
            Err(_) => true,
        }
    }
}
