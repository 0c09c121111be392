//! Unit tests for fl-comms.

use fl_core::{AgentId, Vec2};

use crate::PeerState;

fn state(id: u32, x: f64) -> PeerState {
    PeerState::new(AgentId(id), Vec2::new(x, 1.0), Vec2::new(0.3, -0.05))
}

// ── Wire codec ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod codec {
    use super::*;
    use crate::{ChannelError, decode, encode};

    #[test]
    fn encodes_five_fields() {
        let s = PeerState::new(AgentId(3), Vec2::new(1.25, 0.8), Vec2::new(0.3, -0.02));
        assert_eq!(encode(&s), "3,1.25,0.8,0.3,-0.02");
        assert_eq!(decode(&encode(&s)).unwrap(), s);
    }

    #[test]
    fn tolerates_whitespace_and_newline() {
        let s = decode(" 7, 2.0 ,3.5,0.1,0\n").unwrap();
        assert_eq!(s.id, AgentId(7));
        assert_eq!(s.position, Vec2::new(2.0, 3.5));
        assert_eq!(s.velocity, Vec2::new(0.1, 0.0));
    }

    #[test]
    fn rejects_malformed() {
        for bad in [
            "",
            "1,2,3,4",
            "1,2,3,4,5,6",
            "robot-1,2,3,4,5",
            "1,two,3,4,5",
            "1,NaN,3,4,5",
            "1,inf,3,4,5",
            "-1,2,3,4,5",
        ] {
            assert!(matches!(decode(bad), Err(ChannelError::Malformed(_))), "accepted {bad:?}");
        }
    }
}

// ── InMemoryBus ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod bus {
    use super::*;
    use crate::{CommunicationChannel, InMemoryBus};

    #[test]
    fn broadcast_reaches_others_but_not_self() {
        let bus = InMemoryBus::new();
        let mut a = bus.subscribe(AgentId(1)).unwrap();
        let mut b = bus.subscribe(AgentId(2)).unwrap();
        let mut c = bus.subscribe(AgentId(3)).unwrap();

        a.broadcast(&state(1, 0.5)).unwrap();

        assert!(a.poll_latest().is_empty());
        assert_eq!(b.poll_latest(), vec![state(1, 0.5)]);
        assert_eq!(c.poll_latest(), vec![state(1, 0.5)]);
        assert_eq!(bus.delivered(), 2);
    }

    #[test]
    fn latest_wins_and_poll_drains() {
        let bus = InMemoryBus::new();
        let mut a = bus.subscribe(AgentId(1)).unwrap();
        let mut b = bus.subscribe(AgentId(2)).unwrap();

        a.broadcast(&state(1, 0.5)).unwrap();
        a.broadcast(&state(1, 0.6)).unwrap();

        assert_eq!(b.poll_latest(), vec![state(1, 0.6)]);
        assert!(b.poll_latest().is_empty());
    }

    #[test]
    fn late_delivery_does_not_roll_back() {
        let bus = InMemoryBus::new();
        let mut b = bus.subscribe(AgentId(2)).unwrap();

        assert!(bus.deliver(AgentId(2), 5, state(1, 0.9)).unwrap());
        assert!(!bus.deliver(AgentId(2), 4, state(1, 0.1)).unwrap());
        assert!(!bus.deliver(AgentId(9), 1, state(1, 0.1)).unwrap());

        assert_eq!(b.poll_latest(), vec![state(1, 0.9)]);
    }

    #[test]
    fn poll_is_sorted_by_sender() {
        let bus = InMemoryBus::new();
        let mut me = bus.subscribe(AgentId(0)).unwrap();
        let mut others: Vec<_> =
            [5, 2, 9].iter().map(|&id| bus.subscribe(AgentId(id)).unwrap()).collect();
        for peer in &mut others {
            let id = peer.id().0;
            peer.broadcast(&state(id, id as f64)).unwrap();
        }
        let ids: Vec<u32> = me.poll_latest().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, [2, 5, 9]);
        assert_eq!(bus.subscriber_count(), 4);
    }

    #[test]
    fn subscribed_endpoint_is_ready() {
        let bus = InMemoryBus::new();
        let a = bus.subscribe(AgentId(1)).unwrap();
        assert!(a.is_ready());
    }
}

// ── UdpChannel ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod udp {
    use std::net::UdpSocket;
    use std::thread::sleep;
    use std::time::Duration;

    use super::*;
    use crate::{ChannelError, CommunicationChannel, UdpChannel};

    fn poll_until_some(ch: &mut UdpChannel) -> Vec<PeerState> {
        for _ in 0..200 {
            let got = ch.poll_latest();
            if !got.is_empty() {
                return got;
            }
            sleep(Duration::from_millis(5));
        }
        Vec::new()
    }

    #[test]
    fn loopback_exchange_drops_malformed() {
        let mut rx = UdpChannel::bind(AgentId(2), "127.0.0.1:0", Vec::new()).unwrap();
        let rx_addr = rx.local_addr().unwrap();

        let raw = UdpSocket::bind("127.0.0.1:0").unwrap();
        raw.send_to(b"garbage", rx_addr).unwrap();

        let mut tx = UdpChannel::bind(AgentId(1), "127.0.0.1:0", vec![rx_addr]).unwrap();
        tx.broadcast(&state(1, 0.5)).unwrap();
        tx.broadcast(&state(1, 0.75)).unwrap();

        // Let both datagrams land so the poll sees them together.
        sleep(Duration::from_millis(50));
        let got = poll_until_some(&mut rx);
        assert_eq!(got, vec![state(1, 0.75)]);
        assert_eq!(rx.dropped(), 1);
    }

    #[test]
    fn failed_target_does_not_starve_the_rest() {
        let mut rx = UdpChannel::bind(AgentId(2), "127.0.0.1:0", Vec::new()).unwrap();
        let rx_addr = rx.local_addr().unwrap();
        // Port 0 is never a valid destination.
        let bad: std::net::SocketAddr = "127.0.0.1:0".parse().unwrap();

        let mut tx = UdpChannel::bind(AgentId(1), "127.0.0.1:0", vec![bad, rx_addr]).unwrap();
        assert!(matches!(tx.broadcast(&state(1, 0.5)), Err(ChannelError::Io(_))));

        assert_eq!(poll_until_some(&mut rx), vec![state(1, 0.5)]);
    }

    #[test]
    fn arrival_order_decides_latest() {
        let mut rx = UdpChannel::bind(AgentId(2), "127.0.0.1:0", Vec::new()).unwrap();
        let rx_addr = rx.local_addr().unwrap();
        let raw = UdpSocket::bind("127.0.0.1:0").unwrap();
        raw.send_to(b"1,2,2,0,0", rx_addr).unwrap();
        raw.send_to(b"1,1,1,0,0", rx_addr).unwrap();

        sleep(Duration::from_millis(50));
        let got = poll_until_some(&mut rx);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].position, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn own_echo_is_ignored() {
        let mut ch = UdpChannel::bind(AgentId(4), "127.0.0.1:0", Vec::new()).unwrap();
        let addr = ch.local_addr().unwrap();
        let raw = UdpSocket::bind("127.0.0.1:0").unwrap();
        raw.send_to(b"4,1,1,0,0", addr).unwrap();
        sleep(Duration::from_millis(50));
        assert!(ch.poll_latest().is_empty());
        assert_eq!(ch.dropped(), 0);
    }
}

// ── LossyChannel ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod lossy {
    use fl_core::AgentRng;

    use super::*;
    use crate::{CommunicationChannel, InMemoryBus, LossyChannel};

    fn setup(p: f64) -> (crate::BusEndpoint, LossyChannel<crate::BusEndpoint>) {
        let bus = InMemoryBus::new();
        let tx = bus.subscribe(AgentId(1)).unwrap();
        let rx = bus.subscribe(AgentId(2)).unwrap();
        (tx, LossyChannel::new(rx, AgentRng::new(7, AgentId(2)), p))
    }

    #[test]
    fn certain_loss_drops_everything() {
        let (mut tx, mut rx) = setup(1.0);
        tx.broadcast(&state(1, 0.5)).unwrap();
        assert!(rx.poll_latest().is_empty());
        assert_eq!(rx.lost(), 1);
    }

    #[test]
    fn no_loss_passes_through() {
        let (mut tx, mut rx) = setup(0.0);
        tx.broadcast(&state(1, 0.5)).unwrap();
        assert_eq!(rx.poll_latest(), vec![state(1, 0.5)]);
        assert_eq!(rx.lost(), 0);
        assert!(rx.is_ready());
    }
}
