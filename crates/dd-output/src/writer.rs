//! The `OutputWriter` trait implemented by backend writers.

use crate::{BatteryRow, OutputResult, TickSummaryRow};

/// Sink for simulation telemetry.
///
/// Errors surface to [`OutputController`](crate::OutputController), which
/// keeps the first one for [`take_error`](crate::OutputController::take_error).
pub trait OutputWriter {
    /// Write the battery levels of one snapshot tick.
    fn write_batteries(&mut self, rows: &[BatteryRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush all underlying file handles.
    ///
    /// Idempotent, safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
