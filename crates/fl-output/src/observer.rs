//! `OutputObserver<W>`: bridges `AgentObserver` to an `OutputWriter`.

use std::sync::{Arc, Mutex};

use fl_agent::{AgentObserver, RunSummary, TickReport};
use tracing::warn;

use crate::row::{AgentTickRow, RunSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

struct Shared<W> {
    writer:     W,
    rows:       u64,
    summaries:  u64,
    last_error: Option<OutputError>,
}

impl<W> Shared<W> {
    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

/// An [`AgentObserver`] that writes every tick report and run summary to an
/// [`OutputWriter`] backend.
///
/// Clones share one writer, so a single observer can be cloned into every
/// agent thread of a swarm.  Errors from the writer are stored because
/// observer methods have no return value; [`finish`][Self::finish] reports
/// the first one.
pub struct OutputObserver<W> {
    shared: Arc<Mutex<Shared<W>>>,
}

impl<W> Clone for OutputObserver<W> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<W: OutputWriter> OutputObserver<W> {
    pub fn new(writer: W) -> Self {
        let shared = Shared { writer, rows: 0, summaries: 0, last_error: None };
        Self { shared: Arc::new(Mutex::new(shared)) }
    }

    /// `(tick rows, summary rows)` written so far.
    pub fn counts(&self) -> (u64, u64) {
        self.shared.lock().map(|s| (s.rows, s.summaries)).unwrap_or_default()
    }

    /// Take the stored write error, if any.
    pub fn take_error(&self) -> Option<OutputError> {
        match self.shared.lock() {
            Ok(mut s) => s.last_error.take(),
            Err(_) => Some(OutputError::Poisoned),
        }
    }

    /// Flush the writer.  Returns the first error seen during the run, or the
    /// flush error.
    pub fn finish(&self) -> OutputResult<()> {
        let mut s = self.shared.lock().map_err(|_| OutputError::Poisoned)?;
        let flushed = s.writer.finish();
        match s.last_error.take() {
            Some(e) => Err(e),
            None => flushed,
        }
    }

    fn with<F>(&self, f: F)
    where
        F: FnOnce(&mut Shared<W>),
    {
        match self.shared.lock() {
            Ok(mut s) => f(&mut s),
            Err(_) => warn!("output writer lock poisoned, dropping record"),
        }
    }
}

impl<W: OutputWriter> AgentObserver for OutputObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        let row = AgentTickRow::from(report);
        self.with(|s| {
            let result = s.writer.write_ticks(std::slice::from_ref(&row));
            if result.is_ok() {
                s.rows += 1;
            }
            s.store_err(result);
        });
    }

    fn on_stopped(&mut self, summary: &RunSummary) {
        let row = RunSummaryRow::from(summary);
        self.with(|s| {
            let result = s.writer.write_summary(&row);
            if result.is_ok() {
                s.summaries += 1;
            }
            s.store_err(result);
        });
    }
}
