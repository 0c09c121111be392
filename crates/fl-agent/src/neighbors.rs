//! Per-agent table of what each peer last reported.

use fl_behavior::NeighborEntry;
use fl_core::{AgentId, Tick, Vec2};

#[cfg(feature = "fx-hash")]
type PeerMap = rustc_hash::FxHashMap<AgentId, NeighborEntry>;
#[cfg(not(feature = "fx-hash"))]
type PeerMap = std::collections::HashMap<AgentId, NeighborEntry>;

/// id → latest (position, velocity, tick received).
///
/// The agent clears and repopulates the table every tick, so it only ever
/// holds peers heard from during the current tick.
#[derive(Clone, Debug, Default)]
pub struct NeighborTable {
    entries: PeerMap,
}

impl NeighborTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Insert or overwrite `id`'s entry.  Last write wins.
    pub fn upsert(&mut self, id: AgentId, position: Vec2, velocity: Vec2, received: Tick) {
        self.entries.insert(id, NeighborEntry { id, position, velocity, received });
    }

    /// Every entry written since the last [`clear`](Self::clear), sorted by
    /// id so rule evaluation order never depends on hash order.
    pub fn snapshot(&self) -> Vec<NeighborEntry> {
        let mut entries: Vec<NeighborEntry> = self.entries.values().copied().collect();
        entries.sort_by_key(|e| e.id);
        entries
    }

    pub fn get(&self, id: AgentId) -> Option<&NeighborEntry> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
