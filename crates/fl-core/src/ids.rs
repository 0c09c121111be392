//! Robot identifiers.
//!
//! An `AgentId` is assigned once per physical robot at swarm start and never
//! changes for the lifetime of a run.  It is the key of every neighbor table
//! and the first field of every peer broadcast.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable identity of one robot in the swarm.
///
/// `Copy + Ord + Hash` so it can key maps and be sorted without ceremony.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub u32);

impl AgentId {
    /// Sentinel meaning "no valid ID".
    pub const INVALID: AgentId = AgentId(u32::MAX);
}

impl Default for AgentId {
    /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "robot-{}", self.0)
    }
}

impl FromStr for AgentId {
    type Err = std::num::ParseIntError;

    /// Parses the bare integer form used on the wire (`"3"`, not `"robot-3"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(AgentId)
    }
}

impl TryFrom<usize> for AgentId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<AgentId, Self::Error> {
        u32::try_from(n).map(AgentId)
    }
}
