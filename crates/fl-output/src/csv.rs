//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `agent_ticks.csv`
//! - `run_summaries.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentTickRow, OutputResult, RunSummaryRow};

pub const TICKS_FILE: &str = "agent_ticks.csv";
pub const SUMMARIES_FILE: &str = "run_summaries.csv";

const TICK_HEADERS: [&str; 14] = [
    "agent_id", "tick", "x", "y", "heading", "vx", "vy", "linear_velocity", "angular_velocity",
    "yaw_degrees", "neighbors", "position_fresh", "force_x", "force_y",
];

const SUMMARY_HEADERS: [&str; 8] =
    ["agent_id", "ticks", "reason", "detail", "overruns", "final_x", "final_y", "final_heading"];

/// Writes run output to two CSV files.
pub struct CsvWriter {
    ticks:     Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open (or truncate) the two CSV files, and write
    /// the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut ticks = Writer::from_path(dir.join(TICKS_FILE))?;
        ticks.write_record(TICK_HEADERS)?;

        let mut summaries = Writer::from_path(dir.join(SUMMARIES_FILE))?;
        summaries.write_record(SUMMARY_HEADERS)?;

        Ok(Self { ticks, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_ticks(&mut self, rows: &[AgentTickRow]) -> OutputResult<()> {
        for row in rows {
            self.ticks.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.heading.to_string(),
                row.vx.to_string(),
                row.vy.to_string(),
                row.linear_velocity.to_string(),
                row.angular_velocity.to_string(),
                row.yaw_degrees.to_string(),
                row.neighbors.to_string(),
                (row.position_fresh as u8).to_string(),
                row.force_x.to_string(),
                row.force_y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_summary(&mut self, row: &RunSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.agent_id.to_string(),
            row.ticks.to_string(),
            row.reason.clone(),
            row.detail.clone(),
            row.overruns.to_string(),
            row.final_x.to_string(),
            row.final_y.to_string(),
            row.final_heading.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.ticks.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
