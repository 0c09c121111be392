//! `fl-output`: run output writers for the rust_flock swarm controller.
//!
//! | Backend | Files created                              |
//! |---------|--------------------------------------------|
//! | CSV     | `agent_ticks.csv`, `run_summaries.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`OutputObserver`], which implements `fl_agent::AgentObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fl_output::{CsvWriter, OutputObserver};
//!
//! let obs = OutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! let specs = specs.into_iter().map(|s| s.observer(Box::new(obs.clone()))).collect();
//! // ... run the swarm ...
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::OutputObserver;
pub use row::{AgentTickRow, RunSummaryRow};
pub use writer::OutputWriter;
