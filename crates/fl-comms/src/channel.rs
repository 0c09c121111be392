use crate::{ChannelResult, PeerState};

/// One agent's view of the swarm network.
///
/// Each agent owns its own channel value; implementations that share a
/// medium (the in-memory bus, a UDP socket pair) synchronise internally.
pub trait CommunicationChannel: Send {
    /// Publish this agent's state to its peers.
    ///
    /// A failure is transient from the agent's point of view: it is logged
    /// and the tick carries on.
    fn broadcast(&mut self, state: &PeerState) -> ChannelResult<()>;

    /// Drain everything received since the last poll, collapsed to the
    /// newest update per peer.  Never includes this agent's own broadcasts.
    fn poll_latest(&mut self) -> Vec<PeerState>;

    /// `true` once the channel can send and receive.
    fn is_ready(&self) -> bool {
        true
    }
}

impl<T: CommunicationChannel + ?Sized> CommunicationChannel for Box<T> {
    fn broadcast(&mut self, state: &PeerState) -> ChannelResult<()> {
        (**self).broadcast(state)
    }

    fn poll_latest(&mut self) -> Vec<PeerState> {
        (**self).poll_latest()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}
