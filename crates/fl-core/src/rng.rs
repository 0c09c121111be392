//! Deterministic per-agent and run-level RNG wrappers.
//!
//! Randomness only enters the system through simulated collaborators:
//! position noise and dropouts, radio loss, and initial scatter.  The
//! control loop itself is deterministic.
//!
//! Each agent gets its own `SmallRng` seeded by
//!
//!   seed = global_seed XOR (agent_id * MIXING_CONSTANT)
//!
//! so agents never share RNG state (each lives on its own thread) and adding
//! a robot to the end of the roster does not disturb the others' streams.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::AgentId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-agent deterministic RNG, owned by one collaborator of one agent.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's global seed and an agent ID.
    pub fn new(global_seed: u64, agent: AgentId) -> Self {
        let seed = global_seed ^ (agent.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Uniform sample in `[-amplitude, amplitude]`; `0.0` when the amplitude
    /// is not positive.
    #[inline]
    pub fn symmetric(&mut self, amplitude: f64) -> f64 {
        if amplitude > 0.0 {
            self.0.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        }
    }
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG for scenario setup (start positions, headings).
///
/// Single-threaded use only; derive an [`AgentRng`] for anything that runs on
/// an agent thread.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Uniform sample in `[low, high)`.  Returns `low` for an empty range.
    #[inline]
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high > low {
            self.0.gen_range(low..high)
        } else {
            low
        }
    }
}
