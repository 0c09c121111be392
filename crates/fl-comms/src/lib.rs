//! `fl-comms`: how robots hear about each other.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                        |
//! |-------------|-----------------------------------------------------------------|
//! | [`message`] | `PeerState`, the `id,x,y,vx,vy` text codec                      |
//! | [`channel`] | `CommunicationChannel` trait                                    |
//! | [`bus`]     | `InMemoryBus`, `BusEndpoint`: shared in-process hub            |
//! | [`udp`]     | `UdpChannel`: datagram transport for real robots               |
//! | [`lossy`]   | `LossyChannel<C>`: random receive loss for degradation tests   |
//! | [`error`]   | `ChannelError`, `ChannelResult<T>`                              |
//!
//! Delivery is best effort everywhere.  A channel never blocks the control
//! loop: `poll_latest` returns whatever has arrived, collapsed to the newest
//! update per peer, and an empty poll is a normal outcome.

pub mod bus;
pub mod channel;
pub mod error;
pub mod lossy;
pub mod message;
pub mod udp;

#[cfg(test)]
mod tests;

pub use bus::{BusEndpoint, InMemoryBus};
pub use channel::CommunicationChannel;
pub use error::{ChannelError, ChannelResult};
pub use lossy::LossyChannel;
pub use message::{PeerState, decode, encode};
pub use udp::UdpChannel;
