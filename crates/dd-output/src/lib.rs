//! `dd-output` — telemetry writers for the drone delivery simulator.
//!
//! | Backend | Files created                                |
//! |---------|----------------------------------------------|
//! | CSV     | `battery_levels.csv`, `tick_summaries.csv`   |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`OutputController`], which implements `dd_sim::Controller`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use dd_output::{CsvWriter, OutputController};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let controller = OutputController::new(writer, &config);
//! let mut model = SimBuilder::new(config, controller).build()?;
//! model.run();
//! let mut controller = model.into_controller();
//! controller.finish();
//! if let Some(e) = controller.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod controller;
pub mod csv;
pub mod error;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use controller::OutputController;
pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{BatteryRow, TickSummaryRow};
pub use writer::OutputWriter;
