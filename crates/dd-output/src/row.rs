//! Plain data row types written by output backends.

use dd_sim::TickSummary;

/// One drone's battery level at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryRow {
    pub tick:            u64,
    pub elapsed_secs:    f64,
    pub drone_id:        u32,
    pub battery_percent: f64,
}

/// Per-tick counters, flattened from [`TickSummary`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub tick:             u64,
    pub elapsed_secs:     f64,
    pub drones:           u64,
    pub available_drones: u64,
    pub matched:          u64,
    pub pending:          u64,
    pub delivered:        u64,
    pub removed:          u64,
}

impl From<&TickSummary> for TickSummaryRow {
    fn from(s: &TickSummary) -> Self {
        Self {
            tick:             s.tick.0,
            elapsed_secs:     s.elapsed_secs,
            drones:           s.drones as u64,
            available_drones: s.available_drones as u64,
            matched:          s.matched as u64,
            pending:          s.pending as u64,
            delivered:        s.delivered as u64,
            removed:          s.removed as u64,
        }
    }
}
