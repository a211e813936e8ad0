//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `battery_levels.csv`
//! - `tick_summaries.csv`

use std::fs::{self, File};
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BatteryRow, OutputResult, TickSummaryRow};

pub const BATTERY_FILE: &str = "battery_levels.csv";
pub const SUMMARY_FILE: &str = "tick_summaries.csv";

/// Writes simulation telemetry to two CSV files.
pub struct CsvWriter {
    batteries: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the two CSV files in it and write the
    /// header rows.  Existing files are truncated.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        fs::create_dir_all(dir)?;

        let mut batteries = Writer::from_path(dir.join(BATTERY_FILE))?;
        batteries.write_record(["tick", "elapsed_secs", "drone_id", "battery_percent"])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARY_FILE))?;
        summaries.write_record([
            "tick",
            "elapsed_secs",
            "drones",
            "available_drones",
            "matched",
            "pending",
            "delivered",
            "removed",
        ])?;

        Ok(Self {
            batteries,
            summaries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_batteries(&mut self, rows: &[BatteryRow]) -> OutputResult<()> {
        for row in rows {
            self.batteries.write_record(&[
                row.tick.to_string(),
                row.elapsed_secs.to_string(),
                row.drone_id.to_string(),
                format!("{:.3}", row.battery_percent),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.elapsed_secs.to_string(),
            row.drones.to_string(),
            row.available_drones.to_string(),
            row.matched.to_string(),
            row.pending.to_string(),
            row.delivered.to_string(),
            row.removed.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.batteries.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
