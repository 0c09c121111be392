//! In-process broadcast hub.
//!
//! Every subscriber has an inbox keyed by sender.  A broadcast stamps the
//! update with the sender's next sequence number and drops it into every
//! other subscriber's inbox, replacing an older update from the same sender.
//! An update that arrives with a lower sequence number than the one already
//! queued is discarded, so delayed delivery can never roll a peer's state
//! backwards.  Polling drains the inbox.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use fl_core::AgentId;
use tracing::trace;

use crate::{ChannelError, ChannelResult, CommunicationChannel, PeerState};

#[derive(Default)]
struct BusInner {
    /// subscriber → (sender → (seq, state))
    inboxes:   HashMap<AgentId, HashMap<AgentId, (u64, PeerState)>>,
    /// Next sequence number per sender.
    next_seq:  HashMap<AgentId, u64>,
    delivered: u64,
}

impl BusInner {
    fn deliver(&mut self, to: AgentId, seq: u64, state: PeerState) -> bool {
        let Some(inbox) = self.inboxes.get_mut(&to) else {
            return false;
        };
        match inbox.get(&state.id) {
            Some(&(queued, _)) if queued >= seq => {
                trace!(%to, from = %state.id, seq, queued, "stale update discarded");
                false
            }
            _ => {
                inbox.insert(state.id, (seq, state));
                self.delivered += 1;
                true
            }
        }
    }
}

/// Shared hub; clone it freely, every clone refers to the same bus.
#[derive(Clone, Default)]
pub struct InMemoryBus {
    inner: Arc<Mutex<BusInner>>,
}

impl InMemoryBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> ChannelResult<MutexGuard<'_, BusInner>> {
        self.inner.lock().map_err(|_| ChannelError::Poisoned)
    }

    /// Register `id` and return its endpoint.  Registering an id twice
    /// returns a second endpoint over the same inbox.
    pub fn subscribe(&self, id: AgentId) -> ChannelResult<BusEndpoint> {
        self.lock()?.inboxes.entry(id).or_default();
        Ok(BusEndpoint { id, bus: self.clone() })
    }

    /// Put a sequenced update straight into one subscriber's inbox.
    ///
    /// Returns `false` when the subscriber is unknown or a newer update from
    /// the same sender is already queued.
    pub fn deliver(&self, to: AgentId, seq: u64, state: PeerState) -> ChannelResult<bool> {
        Ok(self.lock()?.deliver(to, seq, state))
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().map(|inner| inner.inboxes.len()).unwrap_or(0)
    }

    /// Total updates placed into inboxes since the bus was created.
    pub fn delivered(&self) -> u64 {
        self.lock().map(|inner| inner.delivered).unwrap_or(0)
    }
}

/// One subscriber's handle on an [`InMemoryBus`].
#[derive(Clone)]
pub struct BusEndpoint {
    id:  AgentId,
    bus: InMemoryBus,
}

impl BusEndpoint {
    pub fn id(&self) -> AgentId {
        self.id
    }
}

impl CommunicationChannel for BusEndpoint {
    fn broadcast(&mut self, state: &PeerState) -> ChannelResult<()> {
        let mut inner = self.bus.lock()?;
        let seq = {
            let next = inner.next_seq.entry(state.id).or_insert(0);
            *next += 1;
            *next
        };
        let targets: Vec<AgentId> =
            inner.inboxes.keys().copied().filter(|&to| to != state.id).collect();
        for to in targets {
            inner.deliver(to, seq, *state);
        }
        Ok(())
    }

    fn poll_latest(&mut self) -> Vec<PeerState> {
        let Ok(mut inner) = self.bus.lock() else {
            return Vec::new();
        };
        let own = self.id;
        let Some(inbox) = inner.inboxes.get_mut(&own) else {
            return Vec::new();
        };
        let mut updates: Vec<PeerState> = inbox
            .drain()
            .map(|(_, (_, state))| state)
            .filter(|state| state.id != own)
            .collect();
        updates.sort_by_key(|state| state.id);
        updates
    }

    fn is_ready(&self) -> bool {
        self.bus.lock().map(|inner| inner.inboxes.contains_key(&self.id)).unwrap_or(false)
    }
}
