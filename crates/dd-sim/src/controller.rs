//! The outbound interface to whatever drives and displays the model.

use serde::Serialize;

use dd_core::{EntityId, Tick, TripRequest, Vec3};
use dd_fleet::EntityKind;

/// Snapshot of one entity as the view layer sees it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntityView {
    pub id:        EntityId,
    #[serde(skip)]
    pub kind:      EntityKind,
    /// Descriptor `type` string, e.g. `"lightDrone"`.
    #[serde(rename = "type")]
    pub type_name: String,
    pub name:      String,
    pub position:  Vec3,
    pub direction: Vec3,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

/// One-way notifications sent to the controller.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", content = "details")]
pub enum SimEvent {
    /// A trip request was paired with its package and queued.
    DeliveryScheduled(TripRequest),
    /// Battery percentage of every drone, in id order.  Sent every tick.
    UpdateBatteries(Vec<f64>),
    /// A drone released a package at its destination.
    DeliveryCompleted {
        package:   EntityId,
        recipient: Option<EntityId>,
    },
}

impl SimEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SimEvent::DeliveryScheduled(_)     => "DeliveryScheduled",
            SimEvent::UpdateBatteries(_)       => "UpdateBatteries",
            SimEvent::DeliveryCompleted { .. } => "DeliveryCompleted",
        }
    }
}

/// Per-tick counters handed to [`Controller::on_tick_end`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct TickSummary {
    pub tick:             Tick,
    pub elapsed_secs:     f64,
    pub drones:           usize,
    pub available_drones: usize,
    /// Deliveries assigned to a drone by this tick's matching pass.
    pub matched:          usize,
    /// Deliveries left in the queue after matching.
    pub pending:          usize,
    /// Packages handed to their recipient this tick.
    pub delivered:        usize,
    pub removed:          usize,
}

/// Receiver of the model's notification stream.
///
/// All methods default to no-ops so implementors only override what they
/// need.  Calls arrive in tick-phase order: `update_entity` for every entity,
/// then `send_event`s, then `remove_entity`s, then `on_tick_end`.
pub trait Controller {
    fn add_entity(&mut self, _entity: &EntityView) {}

    fn update_entity(&mut self, _entity: &EntityView) {}

    fn remove_entity(&mut self, _entity: &EntityView) {}

    fn send_event(&mut self, _tick: Tick, _event: &SimEvent) {}

    /// Called once at the end of each tick, after matching.
    fn on_tick_end(&mut self, _summary: &TickSummary) {}

    /// The model was asked to stop.
    fn stop(&mut self) {}
}

/// A [`Controller`] that ignores everything.
pub struct NoopController;

impl Controller for NoopController {}

/// A [`Controller`] that keeps the whole notification stream in memory.
#[derive(Debug, Default)]
pub struct RecordingController {
    pub added:     Vec<EntityId>,
    pub updates:   usize,
    pub removed:   Vec<EntityId>,
    pub events:    Vec<(Tick, SimEvent)>,
    pub summaries: Vec<TickSummary>,
    pub stopped:   bool,
}

impl RecordingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events named `name`, in arrival order.
    pub fn events_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SimEvent> + 'a {
        self.events.iter().map(|(_, e)| e).filter(move |e| e.name() == name)
    }

    /// The most recent `UpdateBatteries` payload.
    pub fn last_batteries(&self) -> Option<&[f64]> {
        self.events.iter().rev().find_map(|(_, e)| match e {
            SimEvent::UpdateBatteries(b) => Some(b.as_slice()),
            _ => None,
        })
    }
}

impl Controller for RecordingController {
    fn add_entity(&mut self, entity: &EntityView) {
        self.added.push(entity.id);
    }

    fn update_entity(&mut self, _entity: &EntityView) {
        self.updates += 1;
    }

    fn remove_entity(&mut self, entity: &EntityView) {
        self.removed.push(entity.id);
    }

    fn send_event(&mut self, tick: Tick, event: &SimEvent) {
        self.events.push((tick, event.clone()));
    }

    fn on_tick_end(&mut self, summary: &TickSummary) {
        self.summaries.push(*summary);
    }

    fn stop(&mut self) {
        self.stopped = true;
    }
}
