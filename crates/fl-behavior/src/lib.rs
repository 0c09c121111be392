//! `fl-behavior`: flocking steering rules.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                         |
//! |--------------|------------------------------------------------------------------|
//! | [`context`]  | `RuleContext<'a>`, `NeighborEntry`: read-only rule inputs       |
//! | [`outcome`]  | `RuleOutput`, `RuleOutcome`, `Steering`                          |
//! | [`model`]    | `SteeringRule` trait                                             |
//! | [`flocking`] | `Alignment`, `Cohesion`, `Separation`                            |
//! | [`boundary`] | `WallAvoidance`, `ObstacleAvoidance`                             |
//! | [`set`]      | `BehaviorSet`: weighted combination of rules                    |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                             |
//!
//! # Design notes
//!
//! Every rule is a pure function of one agent's own state, a snapshot of its
//! neighbors, and the rule's own parameters.  No rule reads another rule's
//! output; [`BehaviorSet`] is the only place rule results meet, as a weighted
//! sum.  Rules therefore only need `&self` and can be shared across agent
//! threads.

pub mod boundary;
pub mod context;
pub mod error;
pub mod flocking;
pub mod model;
pub mod outcome;
pub mod set;


pub use boundary::{ObstacleAvoidance, WallAvoidance};
pub use context::{NeighborEntry, OwnState, RuleContext};
pub use error::{BehaviorError, BehaviorResult};
pub use flocking::{Alignment, Cohesion, Separation};
pub use model::SteeringRule;
pub use outcome::{RuleOutcome, RuleOutput, Steering};
pub use set::BehaviorSet;
