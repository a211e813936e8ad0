//! `OutputController<W>` — bridges `Controller` to an `OutputWriter`.

use std::collections::BTreeSet;

use tracing::{debug, warn};

use dd_core::{EntityId, SimConfig, Tick};
use dd_fleet::EntityKind;
use dd_sim::{Controller, EntityView, SimEvent, TickSummary};

use crate::row::{BatteryRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`Controller`] that writes battery levels and tick summaries to any
/// [`OutputWriter`] backend.
///
/// `UpdateBatteries` carries percentages only, in drone id order; the
/// controller pairs them with ids by tracking drone additions and removals.
/// Battery rows are written on snapshot ticks (`output_interval_ticks`),
/// summaries on every tick.
///
/// Errors from the writer are stored because `Controller` methods have no
/// return value.  Check with [`take_error`][Self::take_error] after the run.
pub struct OutputController<W: OutputWriter> {
    writer:     W,
    tick_dt:    f64,
    interval:   u64,
    drones:     BTreeSet<EntityId>,
    delivered:  u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> OutputController<W> {
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            tick_dt:    config.tick_dt,
            interval:   config.output_interval_ticks,
            drones:     BTreeSet::new(),
            delivered:  0,
            last_error: None,
        }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Packages delivered so far.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    /// Flush the writer.  Also done on [`Controller::stop`].
    pub fn finish(&mut self) {
        let result = self.writer.finish();
        self.store_err(result);
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn is_snapshot_tick(&self, tick: Tick) -> bool {
        self.interval > 0 && tick.0.is_multiple_of(self.interval)
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }

    fn write_batteries(&mut self, tick: Tick, percents: &[f64]) {
        if percents.len() != self.drones.len() {
            warn!(
                %tick,
                reported = percents.len(),
                tracked = self.drones.len(),
                "battery report does not match tracked drones"
            );
        }
        let elapsed_secs = (tick.0 + 1) as f64 * self.tick_dt;
        let rows: Vec<BatteryRow> = self
            .drones
            .iter()
            .zip(percents)
            .map(|(id, &battery_percent)| BatteryRow {
                tick: tick.0,
                elapsed_secs,
                drone_id: id.0,
                battery_percent,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_batteries(&rows);
            self.store_err(result);
        }
    }
}

impl<W: OutputWriter> Controller for OutputController<W> {
    fn add_entity(&mut self, entity: &EntityView) {
        if entity.kind == EntityKind::Drone {
            self.drones.insert(entity.id);
        }
    }

    fn remove_entity(&mut self, entity: &EntityView) {
        self.drones.remove(&entity.id);
    }

    fn send_event(&mut self, tick: Tick, event: &SimEvent) {
        match event {
            SimEvent::UpdateBatteries(percents) if self.is_snapshot_tick(tick) => {
                self.write_batteries(tick, percents);
            }
            SimEvent::DeliveryCompleted { package, recipient } => {
                self.delivered += 1;
                debug!(%tick, %package, ?recipient, "delivery recorded");
            }
            _ => {}
        }
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(summary));
        self.store_err(result);
    }

    fn stop(&mut self) {
        self.finish();
    }
}
