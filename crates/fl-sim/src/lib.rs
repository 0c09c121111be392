//! `fl-sim`: running a swarm.
//!
//! # Two ways to run
//!
//! ```text
//! SwarmRunner   one OS thread per agent, wall-clock tick cadence,
//!               shared stop signal; the production shape.
//!
//! LockstepSim   all agents on the calling thread, one tick each per
//!               step, no sleeping; reproducible for a fixed seed.
//! ```
//!
//! Both can be wired to a [`SimWorld`], an in-process kinematic arena that
//! provides position sources and actuators, and to the in-memory bus from
//! `fl-comms`.  A [`Scenario`] describes the robots and the world's noise.
//!
//! # Crate layout
//!
//! | Module       | Contents                                            |
//! |--------------|-----------------------------------------------------|
//! | [`runner`]   | `SwarmRunner`, `AgentSpec`                          |
//! | [`lockstep`] | `LockstepSim`                                       |
//! | [`world`]    | `SimWorld`, `Pose`, simulated actuator and tracking |
//! | [`scenario`] | `Scenario`, `RobotSpec`                             |
//! | [`error`]    | `SimError`, `SimResult<T>`                          |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Ticks the agents of one lockstep step on Rayon's pool.   |
//! | `fx-hash`  | Forwarded to `fl-agent`.                                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use fl_comms::InMemoryBus;
//! use fl_core::FlockConfig;
//! use fl_sim::{Scenario, SwarmRunner};
//!
//! let config = FlockConfig::reference();
//! let scenario = Scenario::scatter(5, config.arena(), 42)?;
//! let world = scenario.world(&config);
//! let runner = SwarmRunner::spawn(&config, scenario.build_specs(&world, &InMemoryBus::new())?)?;
//! runner.stop_all();
//! for (id, summary) in runner.join_all() { /* ... */ }
//! ```

pub mod error;
pub mod lockstep;
pub mod runner;
pub mod scenario;
pub mod world;


pub use error::{SimError, SimResult};
pub use lockstep::LockstepSim;
pub use runner::{AgentSpec, BoxedObserver, SwarmRunner};
pub use scenario::{RobotSpec, Scenario, SimAgent};
pub use world::{Pose, SimWorld, SimulatedActuator, SimulatedPositionSource};
