//! `fl-agent`: one robot's flocking control loop.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`agent`]     | `Agent<P, C, A>`: tick and run loop                          |
//! | [`builder`]   | `AgentBuilder` (fluent construction from `FlockConfig`)       |
//! | [`neighbors`] | `NeighborTable`: per-tick peer view                          |
//! | [`state`]     | `KinematicState`                                              |
//! | [`lifecycle`] | `Lifecycle`, `LifecycleCell`, `StopSignal`                    |
//! | [`report`]    | `TickReport`, `RunSummary`, `StopReason`                      |
//! | [`observer`]  | `AgentObserver` trait, `NoopObserver`                         |
//! | [`error`]     | `AgentError`, `AgentResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                         |
//! |-----------|----------------------------------------------------------------|
//! | `fx-hash` | `NeighborTable` uses `FxHashMap` instead of the std hasher     |
//!
//! Each agent owns its neighbor table and collaborators outright.  The only
//! state it shares with other agents is whatever its communication channel
//! shares internally.

pub mod agent;
pub mod builder;
pub mod error;
pub mod lifecycle;
pub mod neighbors;
pub mod observer;
pub mod report;
pub mod state;

#[cfg(test)]
mod tests;

pub use agent::Agent;
pub use builder::AgentBuilder;
pub use error::{AgentError, AgentResult};
pub use fl_behavior::NeighborEntry;
pub use lifecycle::{Lifecycle, LifecycleCell, StopSignal};
pub use neighbors::NeighborTable;
pub use observer::{AgentObserver, NoopObserver};
pub use report::{RunSummary, StopReason, TickReport};
pub use state::KinematicState;
