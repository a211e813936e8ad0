//! The delivery drone and its task state machine.
//!
//! A drone holds up to three legs at once (to the package, to the package's
//! destination, and back to a charging station) and advances exactly one of
//! them per tick, chosen in that priority order.
//!
//! # Tick rules
//!
//! 1. **Bind a station.**  A drone without a bound station looks up the
//!    closest one and starts a beeline toward it.  With no stations in the
//!    world it retries next tick.
//! 2. **To package.**  Runs only while `battery > charge_required`; otherwise
//!    the drone waits at a station until it has charged enough.  A waiting
//!    drone that is not docked first flies to the closest station and queues
//!    up there.  The first step releases the station the drone was docked at
//!    and zeroes the requirement.  On arrival the package is picked up.
//! 3. **To destination.**  The carried package follows the drone.  On
//!    arrival the package is handed to its recipient.
//! 4. **To station.**  On arrival the drone becomes available and queues up
//!    at its bound station.
//!
//! Every moving tick drains `speed × dt` from the battery, regardless of the
//! distance actually covered.  The battery stays within `[0, capacity]`.

use std::fmt;

use tracing::{debug, info, warn};

use dd_core::{EntityId, Vec3};
use dd_movement::{
    build_strategy, step_toward, BeelineStrategy, MovementStrategy, ARRIVAL_TOLERANCE,
};
use dd_spatial::RoutingGraph;

use crate::{closest_station, Body, FleetContext, Package, StationTable};

/// Coarse view of which leg a drone is on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DroneState {
    /// No station bound yet.
    SeekingStation,
    /// Heading to (or waiting to leave for) a package pickup.
    ToPackage,
    /// Carrying a package to its destination.
    ToDestination,
    /// Flying back to a charging station.
    ToStation,
    /// At a station (queued, plugged in, or idle after a full charge).
    Docked,
}

/// Emitted by [`Drone::update`] on the tick a package reaches its recipient.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Handoff {
    pub drone:     EntityId,
    pub package:   EntityId,
    pub recipient: Option<EntityId>,
}

pub struct Drone {
    pub body:         Body,
    available:        bool,
    picked_up:        bool,
    battery_charge:   f64,
    battery_capacity: u32,
    weight_capacity:  u32,
    /// Charge that must be exceeded before the to-package leg may start.
    charge_required:  f64,
    package:          Option<EntityId>,
    to_package:       Option<Box<dyn MovementStrategy>>,
    to_destination:   Option<Box<dyn MovementStrategy>>,
    to_recharge:      Option<Box<dyn MovementStrategy>>,
    /// Station the drone returns to after its current task.
    next_station:     Option<EntityId>,
    /// Station the drone is currently queued or plugged in at.
    docked_station:   Option<EntityId>,
}

impl Drone {
    /// A fully charged, available drone.
    pub fn new(body: Body, battery_capacity: u32, weight_capacity: u32) -> Self {
        Self {
            body,
            available:        true,
            picked_up:        false,
            battery_charge:   f64::from(battery_capacity),
            battery_capacity,
            weight_capacity,
            charge_required:  0.0,
            package:          None,
            to_package:       None,
            to_destination:   None,
            to_recharge:      None,
            next_station:     None,
            docked_station:   None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn speed(&self) -> f64 {
        self.body.speed
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn is_picked_up(&self) -> bool {
        self.picked_up
    }

    pub fn battery_charge(&self) -> f64 {
        self.battery_charge
    }

    pub fn battery_capacity(&self) -> u32 {
        self.battery_capacity
    }

    /// Charge as a percentage of capacity.  A zero-capacity drone reads 0.
    pub fn battery_percent(&self) -> f64 {
        if self.battery_capacity == 0 {
            return 0.0;
        }
        100.0 * self.battery_charge / f64::from(self.battery_capacity)
    }

    pub fn weight_capacity(&self) -> u32 {
        self.weight_capacity
    }

    pub fn charge_required(&self) -> f64 {
        self.charge_required
    }

    pub fn package(&self) -> Option<EntityId> {
        self.package
    }

    pub fn next_station(&self) -> Option<EntityId> {
        self.next_station
    }

    pub fn docked_station(&self) -> Option<EntityId> {
        self.docked_station
    }

    pub fn state(&self) -> DroneState {
        if self.to_package.is_some() {
            DroneState::ToPackage
        } else if self.to_destination.is_some() {
            DroneState::ToDestination
        } else if self.to_recharge.is_some() {
            DroneState::ToStation
        } else if self.next_station.is_none() {
            DroneState::SeekingStation
        } else {
            DroneState::Docked
        }
    }

    /// Add charge, keeping the battery within `[0, capacity]`.
    pub fn recharge(&mut self, amount: f64) {
        self.battery_charge =
            (self.battery_charge + amount).clamp(0.0, f64::from(self.battery_capacity));
    }

    // ── Task assignment ───────────────────────────────────────────────────

    /// Assign a delivery.
    ///
    /// `charge_required` is the charge the drone must exceed before it sets
    /// off; `end_station` is where it goes once the package is delivered.
    /// The carry leg is built from the package's search name over `graph`.
    pub fn set_next_delivery(
        &mut self,
        package:         &mut Package,
        charge_required: f64,
        end_station:     (EntityId, Vec3),
        graph:           Option<&RoutingGraph>,
    ) {
        let (station, station_pos) = end_station;
        let pickup = package.position();
        let destination = package.destination();

        package.set_carrier(Some(self.id()));
        self.package = Some(package.id());
        self.available = false;
        self.picked_up = false;
        self.charge_required = charge_required;
        self.next_station = Some(station);

        self.to_package = Some(Box::new(BeelineStrategy::new(pickup)));
        self.to_destination = Some(build_strategy(package.search(), pickup, destination, graph));
        self.to_recharge = Some(Box::new(BeelineStrategy::new(station_pos)));

        debug!(
            drone = %self.id(),
            package = %package.id(),
            %station,
            charge_required,
            search = %package.search(),
            "delivery assigned"
        );
    }

    /// Drop the current delivery (its package no longer exists) and head for
    /// the bound station.  The drone stays unavailable until it docks there.
    pub fn abandon_delivery(&mut self, stations: &mut StationTable) {
        let Some(package) = self.package.take() else { return };
        warn!(drone = %self.id(), %package, "package removed mid-delivery, abandoning");

        self.release_dock(stations);
        self.picked_up = false;
        self.charge_required = 0.0;
        self.to_package = None;
        self.to_destination = None;
        self.to_recharge = None;
        match self.next_station.and_then(|id| stations.get(&id)) {
            Some(station) => {
                self.to_recharge = Some(Box::new(BeelineStrategy::new(station.position())));
            }
            None => self.next_station = None,
        }
    }

    /// Forget a station that has been removed.  If it was the bound station
    /// the drone re-binds to the closest remaining one on its next update.
    pub fn forget_station(&mut self, station: EntityId) {
        if self.docked_station == Some(station) {
            self.docked_station = None;
        }
        if self.next_station == Some(station) {
            self.next_station = None;
            self.to_recharge = None;
        }
    }

    fn release_dock(&mut self, stations: &mut StationTable) {
        let Some(id) = self.docked_station.take() else { return };
        if let Some(station) = stations.get_mut(&id) {
            station.release(self.id());
        }
    }

    fn drain(&mut self, dt: f64) {
        self.battery_charge = (self.battery_charge - self.body.speed * dt).max(0.0);
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the drone by one tick.  Returns the hand-off when a package
    /// is delivered this tick.
    pub fn update(&mut self, dt: f64, ctx: &mut FleetContext<'_>) -> Option<Handoff> {
        if self.next_station.is_none() {
            self.bind_closest_station(ctx.stations);
        }

        if self.to_package.is_some() {
            self.step_to_package(dt, ctx);
            None
        } else if self.to_destination.is_some() {
            self.step_to_destination(dt, ctx)
        } else if self.to_recharge.is_some() {
            self.step_to_station(dt, ctx);
            None
        } else {
            None
        }
    }

    fn bind_closest_station(&mut self, stations: &StationTable) {
        let Some((station, pos)) = closest_station(stations, self.position()) else {
            return;
        };
        debug!(drone = %self.id(), %station, "bound to closest station");
        self.next_station = Some(station);
        self.to_recharge = Some(Box::new(BeelineStrategy::new(pos)));
    }

    fn step_to_package(&mut self, dt: f64, ctx: &mut FleetContext<'_>) {
        if self.battery_charge <= self.charge_required {
            if self.docked_station.is_none() {
                self.dock_at_closest(dt, ctx.stations);
            }
            return;
        }
        let Some(leg) = self.to_package.as_mut() else { return };
        leg.move_entity(&mut self.body, dt);
        let arrived = leg.is_completed();
        self.drain(dt);

        // The reserved charge is secured once the drone is under way.
        self.release_dock(ctx.stations);
        self.charge_required = 0.0;

        if arrived {
            self.to_package = None;
            self.picked_up = true;
            debug!(drone = %self.id(), package = ?self.package, "package picked up");
        }
    }

    /// Fly toward the closest station and queue up on arrival, so a drone
    /// waiting for charge is actually plugged in somewhere.
    fn dock_at_closest(&mut self, dt: f64, stations: &mut StationTable) {
        let Some((id, pos)) = closest_station(stations, self.position()) else {
            return;
        };
        let moving = self.position().dist(pos) > ARRIVAL_TOLERANCE;
        let budget = self.body.speed * dt;
        let (arrived, _) = step_toward(&mut self.body, pos, budget);
        if moving {
            self.drain(dt);
        }
        if !arrived {
            return;
        }
        if let Some(station) = stations.get_mut(&id) {
            station.queue_up(self.id());
            self.docked_station = Some(id);
            debug!(drone = %self.id(), station = %id, "docked to wait for charge");
        }
    }

    fn step_to_destination(&mut self, dt: f64, ctx: &mut FleetContext<'_>) -> Option<Handoff> {
        let leg = self.to_destination.as_mut()?;
        leg.move_entity(&mut self.body, dt);
        let arrived = leg.is_completed();
        self.drain(dt);

        let package = self.package.and_then(|id| ctx.packages.get_mut(&id));
        if let (Some(package), true) = (package, self.picked_up) {
            package.body.position = self.body.position;
            package.body.direction = self.body.direction;
        }
        if !arrived {
            return None;
        }

        self.to_destination = None;
        self.picked_up = false;
        let package_id = self.package.take()?;
        let recipient = ctx.packages.get_mut(&package_id).and_then(Package::hand_off);
        if let Some(robot) = recipient.and_then(|id| ctx.robots.get_mut(&id)) {
            robot.receive(package_id);
        }
        info!(drone = %self.id(), package = %package_id, recipient = ?recipient, "package delivered");
        Some(Handoff { drone: self.id(), package: package_id, recipient })
    }

    fn step_to_station(&mut self, dt: f64, ctx: &mut FleetContext<'_>) {
        let Some(leg) = self.to_recharge.as_mut() else { return };
        leg.move_entity(&mut self.body, dt);
        let arrived = leg.is_completed();
        self.drain(dt);
        if !arrived {
            return;
        }

        self.to_recharge = None;
        self.available = true;
        match self.next_station.and_then(|id| ctx.stations.get_mut(&id)) {
            Some(station) => {
                station.queue_up(self.id());
                self.docked_station = Some(station.id());
                debug!(drone = %self.id(), station = %station.id(), "queued for charging");
            }
            None => {
                warn!(drone = %self.id(), "bound station vanished, re-binding");
                self.next_station = None;
            }
        }
    }
}

impl fmt::Debug for Drone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drone")
            .field("id", &self.body.id)
            .field("state", &self.state())
            .field("available", &self.available)
            .field("battery_charge", &self.battery_charge)
            .field("battery_capacity", &self.battery_capacity)
            .field("weight_capacity", &self.weight_capacity)
            .field("package", &self.package)
            .field("next_station", &self.next_station)
            .field("docked_station", &self.docked_station)
            .finish()
    }
}
