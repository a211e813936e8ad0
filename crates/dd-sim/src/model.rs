//! The `SimulationModel` and its tick loop.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info, trace, warn};

use dd_core::{EntityDescriptor, EntityId, SimClock, SimConfig, Tick, TripRequest, Vec3};
use dd_fleet::{
    closest_station, ChargingStation, CompositeFactory, Drone, EntityFactory, EntityKind,
    FleetContext, Handoff, Package, Robot,
};
use dd_spatial::RoutingGraph;

use crate::matching::run_matching;
use crate::{Controller, EntityView, Registry, SimEvent, SimResult, TickSummary};

/// Owns the world and advances it one tick at a time.
///
/// # Tick phases
///
/// [`update`](Self::update) runs four phases in a fixed order; each phase
/// sees everything earlier phases did:
///
/// 1. **Entities**: every entity updates in id order and the controller
///    receives `update_entity` for each.  Drones move and drain, stations
///    recharge and promote.
/// 2. **Telemetry**: `UpdateBatteries` (one percentage per drone, id
///    order), then a `DeliveryCompleted` for each hand-off this tick.
/// 3. **Removals**: ids passed to [`remove_entity`](Self::remove_entity)
///    are detached from the delivery queue, stations, and drones, reported
///    to the controller, and dropped.
/// 4. **Matching**: queued deliveries are assigned to drones
///    (see [`crate::matching`]).
///
/// # Mutation discipline
///
/// Station slots and queues change only inside a station's own update and
/// through a drone's `queue_up`/`unplug`/`leave_queue` calls during phase 1,
/// plus the detach step of phase 3.  The registry's tables change only in
/// `create_entity` and phase 3.  The delivery queue changes only in
/// `schedule_trip`, phase 3 and phase 4.
pub struct SimulationModel<C: Controller> {
    pub(crate) config:     SimConfig,
    pub(crate) clock:      SimClock,
    pub(crate) registry:   Registry,
    pub(crate) factory:    CompositeFactory,
    pub(crate) graph:      Option<RoutingGraph>,
    pub(crate) controller: C,
    /// Ids marked for removal at the next sweep, ascending.
    removed:               BTreeSet<EntityId>,
    /// Packages awaiting a drone, in scheduling order.
    deliveries:            VecDeque<EntityId>,
    stopped:               bool,
}

impl<C: Controller> SimulationModel<C> {
    /// An empty world with the standard entity factories.
    pub fn new(config: SimConfig, controller: C) -> Self {
        Self {
            config,
            clock:      SimClock::new(),
            registry:   Registry::new(),
            factory:    CompositeFactory::default(),
            graph:      None,
            controller,
            removed:    BTreeSet::new(),
            deliveries: VecDeque::new(),
            stopped:    false,
        }
    }

    // ── Entity lifecycle ──────────────────────────────────────────────────

    /// Build and register the entity `desc` describes.
    ///
    /// Returns `Ok(None)` when no factory recognizes `desc.kind`, and an
    /// error when a recognized kind is missing a required field.
    pub fn create_entity(&mut self, desc: &EntityDescriptor) -> SimResult<Option<EntityId>> {
        let Some(entity) = self.factory.create(self.registry.peek_id(), desc)? else {
            debug!(kind = %desc.kind, name = %desc.name, "unrecognized entity type");
            return Ok(None);
        };
        let view = EntityView::of_entity(&entity);
        let id = self.registry.insert(entity);
        self.controller.add_entity(&view);
        debug!(%id, kind = %desc.kind, name = %desc.name, "entity created");
        Ok(Some(id))
    }

    /// [`create_entity`](Self::create_entity) from a JSON descriptor.
    pub fn create_entity_json(&mut self, json: &str) -> SimResult<Option<EntityId>> {
        let desc: EntityDescriptor = serde_json::from_str(json)?;
        self.create_entity(&desc)
    }

    /// Mark `id` for removal.  The entity lives until the removal phase of
    /// the next [`update`](Self::update).
    pub fn remove_entity(&mut self, id: EntityId) {
        self.removed.insert(id);
    }

    /// Pair the robot named `trip.name` with the package named
    /// `"{name}_package"` and queue the delivery.
    ///
    /// The robot must still be requesting a delivery and the package must
    /// still require one.  If either is missing nothing happens and `None`
    /// is returned.
    pub fn schedule_trip(&mut self, trip: &TripRequest) -> Option<EntityId> {
        let robots = &self.registry.robots;
        let Some(robot) = self
            .registry
            .named(&trip.name)
            .iter()
            .copied()
            .find(|id| robots.get(id).is_some_and(Robot::requested_delivery))
        else {
            debug!(name = %trip.name, "no requester for trip");
            return None;
        };

        let packages = &self.registry.packages;
        let Some(package_id) = self
            .registry
            .named(&trip.package_name())
            .iter()
            .copied()
            .find(|id| packages.get(id).is_some_and(Package::requires_delivery))
        else {
            debug!(name = %trip.name, "no undelivered package for trip");
            return None;
        };

        let package = self.registry.packages.get_mut(&package_id)?;
        package.init_delivery(robot);
        package.set_weight(trip.weight);
        package.set_strategy_name(trip.search.clone());
        self.deliveries.push_back(package_id);

        info!(
            package = %package_id,
            %robot,
            weight = trip.weight,
            search = %trip.search,
            "delivery scheduled"
        );
        self.controller.send_event(self.clock.current_tick, &SimEvent::DeliveryScheduled(trip.clone()));
        Some(package_id)
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance the world by `dt` seconds.
    pub fn update(&mut self, dt: f64) -> TickSummary {
        let tick = self.clock.current_tick;
        trace!(%tick, dt, "tick start");

        // ── Phase 1: entities ─────────────────────────────────────────────
        let handoffs = self.update_entities(dt);

        // ── Phase 2: telemetry ────────────────────────────────────────────
        let batteries: Vec<f64> = self.registry.drones.values().map(Drone::battery_percent).collect();
        self.controller.send_event(tick, &SimEvent::UpdateBatteries(batteries));
        for h in &handoffs {
            self.controller.send_event(
                tick,
                &SimEvent::DeliveryCompleted { package: h.package, recipient: h.recipient },
            );
        }

        // ── Phase 3: removals ─────────────────────────────────────────────
        let removed = std::mem::take(&mut self.removed);
        let mut removed_count = 0;
        for id in removed {
            if self.remove_now(id) {
                removed_count += 1;
            }
        }

        // ── Phase 4: matching ─────────────────────────────────────────────
        let stats = run_matching(&mut self.registry, &mut self.deliveries, self.graph.as_ref());
        if stats.halted {
            trace!(%tick, pending = self.deliveries.len(), "no available drones, matching halted");
        }

        self.clock.advance(dt);
        let summary = TickSummary {
            tick,
            elapsed_secs:     self.clock.elapsed_secs,
            drones:           self.registry.drones.len(),
            available_drones: self.registry.drones.values().filter(|d| d.is_available()).count(),
            matched:          stats.matched,
            pending:          self.deliveries.len(),
            delivered:        handoffs.len(),
            removed:          removed_count,
        };
        self.controller.on_tick_end(&summary);
        summary
    }

    /// Run `n` ticks of `config.tick_dt`, stopping early if the model is
    /// stopped.
    pub fn run_ticks(&mut self, n: u64) {
        for _ in 0..n {
            if self.stopped {
                break;
            }
            self.update(self.config.tick_dt);
        }
    }

    /// Run until `config.end_tick()` or [`stop`](Self::stop).
    pub fn run(&mut self) {
        let end = self.config.end_tick();
        while !self.stopped && self.clock.current_tick < end {
            self.update(self.config.tick_dt);
        }
        info!(tick = %self.clock.current_tick, elapsed = %self.clock, "simulation finished");
    }

    /// Tell the controller to stop and halt `run`/`run_ticks`.
    pub fn stop(&mut self) {
        self.stopped = true;
        self.controller.stop();
    }

    fn update_entities(&mut self, dt: f64) -> Vec<Handoff> {
        let mut handoffs = Vec::new();
        let reg = &mut self.registry;
        for (&id, &kind) in &reg.kinds {
            match kind {
                EntityKind::Drone => {
                    if let Some(drone) = reg.drones.get_mut(&id) {
                        let mut ctx =
                            FleetContext::new(&mut reg.packages, &mut reg.stations, &mut reg.robots);
                        handoffs.extend(drone.update(dt, &mut ctx));
                    }
                }
                EntityKind::ChargingStation => {
                    if let Some(station) = reg.stations.get_mut(&id) {
                        station.update(dt, &mut reg.drones);
                    }
                }
                // Packages move only with their drone; robots never move.
                EntityKind::Package | EntityKind::Robot => {}
            }
            if let Some(view) = reg.view(id) {
                self.controller.update_entity(&view);
            }
        }
        handoffs
    }

    /// Detach `id` from everything that references it, notify the
    /// controller, and drop it.  Returns `false` for an unknown id.
    fn remove_now(&mut self, id: EntityId) -> bool {
        self.deliveries.retain(|&p| p != id);
        let Some(entity) = self.registry.remove(id) else {
            debug!(%id, "removal of unknown entity ignored");
            return false;
        };
        let kind = entity.kind();
        let reg = &mut self.registry;

        match kind {
            EntityKind::Drone => {
                for station in reg.stations.values_mut() {
                    station.release(id);
                }
                // Its package goes back on the queue from wherever it is.
                for package in reg.packages.values_mut() {
                    if package.carrier() == Some(id) {
                        package.set_carrier(None);
                        if !package.is_delivered() {
                            warn!(drone = %id, package = %package.id(), "carrier removed, re-queueing package");
                            self.deliveries.push_back(package.id());
                        }
                    }
                }
            }
            EntityKind::Package => {
                for drone in reg.drones.values_mut() {
                    if drone.package() == Some(id) {
                        drone.abandon_delivery(&mut reg.stations);
                    }
                }
            }
            EntityKind::ChargingStation => {
                for drone in reg.drones.values_mut() {
                    drone.forget_station(id);
                }
            }
            EntityKind::Robot => {}
        }

        self.controller.remove_entity(&EntityView::of_entity(&entity));
        debug!(%id, %kind, "entity removed");
        true
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Closest charging station to `position`; ties go to the lowest id.
    pub fn closest_recharge_station(&self, position: Vec3) -> Option<EntityId> {
        closest_station(&self.registry.stations, position).map(|(id, _)| id)
    }

    pub fn set_graph(&mut self, graph: RoutingGraph) {
        self.graph = Some(graph);
    }

    pub fn graph(&self) -> Option<&RoutingGraph> {
        self.graph.as_ref()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn current_tick(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Hand back the controller, consuming the model.
    pub fn into_controller(self) -> C {
        self.controller
    }

    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.registry.kind(id)
    }

    pub fn view(&self, id: EntityId) -> Option<EntityView> {
        self.registry.view(id)
    }

    /// Ids of every entity named `name`, ascending.
    pub fn find_named(&self, name: &str) -> &[EntityId] {
        self.registry.named(name)
    }

    pub fn drone(&self, id: EntityId) -> Option<&Drone> {
        self.registry.drones.get(&id)
    }

    pub fn package(&self, id: EntityId) -> Option<&Package> {
        self.registry.packages.get(&id)
    }

    pub fn station(&self, id: EntityId) -> Option<&ChargingStation> {
        self.registry.stations.get(&id)
    }

    pub fn robot(&self, id: EntityId) -> Option<&Robot> {
        self.registry.robots.get(&id)
    }

    pub fn drones(&self) -> impl Iterator<Item = &Drone> {
        self.registry.drones.values()
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.registry.packages.values()
    }

    pub fn stations(&self) -> impl Iterator<Item = &ChargingStation> {
        self.registry.stations.values()
    }

    pub fn robots(&self) -> impl Iterator<Item = &Robot> {
        self.registry.robots.values()
    }

    /// Packages awaiting a drone, front first.
    pub fn pending_deliveries(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.deliveries.iter().copied()
    }
}
