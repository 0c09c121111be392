//! A channel wrapper that randomly loses received updates.

use fl_core::AgentRng;
use tracing::trace;

use crate::{ChannelResult, CommunicationChannel, PeerState};

/// Drops each received update independently with `drop_probability`.
///
/// Broadcasts pass through untouched; loss is modelled on the receiving
/// side so each agent sees its own pattern of gaps.
pub struct LossyChannel<C> {
    inner:            C,
    rng:              AgentRng,
    drop_probability: f64,
    lost:             u64,
}

impl<C: CommunicationChannel> LossyChannel<C> {
    pub fn new(inner: C, rng: AgentRng, drop_probability: f64) -> Self {
        Self { inner, rng, drop_probability: drop_probability.clamp(0.0, 1.0), lost: 0 }
    }

    /// Updates discarded so far.
    pub fn lost(&self) -> u64 {
        self.lost
    }

    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: CommunicationChannel> CommunicationChannel for LossyChannel<C> {
    fn broadcast(&mut self, state: &PeerState) -> ChannelResult<()> {
        self.inner.broadcast(state)
    }

    fn poll_latest(&mut self) -> Vec<PeerState> {
        let mut received = self.inner.poll_latest();
        let before = received.len();
        received.retain(|_| !self.rng.gen_bool(self.drop_probability));
        let lost = (before - received.len()) as u64;
        if lost > 0 {
            self.lost += lost;
            trace!(lost, kept = received.len(), "lossy channel dropped updates");
        }
        received
    }

    fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }
}
