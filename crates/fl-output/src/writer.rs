//! The `OutputWriter` trait implemented by output backends.

use crate::{AgentTickRow, OutputResult, RunSummaryRow};

/// A sink for run output.
///
/// Errors are stored by [`OutputObserver`][crate::OutputObserver] because
/// observer callbacks have no return value.
pub trait OutputWriter {
    /// Write a batch of per-tick rows.
    fn write_ticks(&mut self, rows: &[AgentTickRow]) -> OutputResult<()>;

    /// Write one agent's run summary.
    fn write_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
