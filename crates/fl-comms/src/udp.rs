//! Datagram transport for physical robots.
//!
//! Each robot binds one non-blocking UDP socket and sends its wire-form
//! state to a fixed list of peer addresses (or a subnet broadcast address).
//! Receiving never blocks: `poll_latest` reads until the socket would block.
//!
//! The wire form carries no sequence number, so "latest" means the last
//! datagram to arrive.  If the network reorders two datagrams from one peer
//! inside a poll window, the older state wins for that tick and is corrected
//! by the peer's next broadcast.  The in-memory bus does not have this gap.
//!
//! A send to one unreachable target does not starve the others: every
//! target is tried and the first failure is returned afterwards.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use fl_core::AgentId;
use tracing::{trace, warn};

use crate::{ChannelError, ChannelResult, CommunicationChannel, PeerState, decode, encode};

/// Largest datagram read; a wire message is well under 128 bytes.
const RECV_BUFFER: usize = 512;

pub struct UdpChannel {
    id:      AgentId,
    socket:  UdpSocket,
    targets: Vec<SocketAddr>,
    dropped: u64,
}

impl UdpChannel {
    /// Bind `local` and send to every address in `targets`.
    pub fn bind<A: ToSocketAddrs>(id: AgentId, local: A, targets: Vec<SocketAddr>) -> ChannelResult<Self> {
        let socket = UdpSocket::bind(local)?;
        socket.set_nonblocking(true)?;
        socket.set_broadcast(true)?;
        Ok(Self { id, socket, targets, dropped: 0 })
    }

    pub fn local_addr(&self) -> ChannelResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Malformed datagrams discarded so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl CommunicationChannel for UdpChannel {
    fn broadcast(&mut self, state: &PeerState) -> ChannelResult<()> {
        let line = encode(state);
        let mut first_err = None;
        for target in &self.targets {
            if let Err(e) = self.socket.send_to(line.as_bytes(), target) {
                warn!(agent = %self.id, %target, error = %e, "udp send failed");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn poll_latest(&mut self) -> Vec<PeerState> {
        let mut latest: HashMap<AgentId, PeerState> = HashMap::new();
        let mut buf = [0u8; RECV_BUFFER];
        loop {
            let (len, from) = match self.socket.recv_from(&mut buf) {
                Ok(received) => received,
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    warn!(agent = %self.id, error = %e, "udp receive failed");
                    break;
                }
            };
            let parsed = std::str::from_utf8(&buf[..len])
                .map_err(|e| ChannelError::Malformed(e.to_string()))
                .and_then(decode);
            match parsed {
                Ok(state) if state.id == self.id => {}
                Ok(state) => {
                    latest.insert(state.id, state);
                }
                Err(e) => {
                    self.dropped += 1;
                    trace!(agent = %self.id, %from, error = %e, "dropping datagram");
                }
            }
        }
        let mut updates: Vec<PeerState> = latest.into_values().collect();
        updates.sort_by_key(|state| state.id);
        updates
    }
}
