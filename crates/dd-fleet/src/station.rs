//! Charging stations: a fixed set of slots plus a FIFO waiting queue.
//!
//! # Slot discipline
//!
//! * `slots_available` always equals the number of empty slots.
//! * A drone is in at most one slot, and never in a slot and the queue at
//!   the same time.
//! * Freeing a slot while drones wait hands the slot straight to the front
//!   of the queue; the free-slot count does not change.
//!
//! Only the station mutates its slots and queue.  Drones touch them through
//! [`queue_up`](ChargingStation::queue_up), [`unplug`](ChargingStation::unplug)
//! and [`leave_queue`](ChargingStation::leave_queue).

use std::collections::VecDeque;

use tracing::{debug, warn};

use dd_core::{EntityId, Vec3};

use crate::{Body, DroneTable, StationTable};

#[derive(Debug, Clone)]
pub struct ChargingStation {
    pub body:        Body,
    slots_available: u32,
    charge_rate:     f64,
    slots:           Vec<Option<EntityId>>,
    queue:           VecDeque<EntityId>,
}

impl ChargingStation {
    pub fn new(body: Body, slots: u32, charge_rate: f64) -> Self {
        Self {
            body,
            slots_available: slots,
            charge_rate,
            slots: vec![None; slots as usize],
            queue: VecDeque::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.body.id
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots_available(&self) -> u32 {
        self.slots_available
    }

    pub fn charge_rate(&self) -> f64 {
        self.charge_rate
    }

    /// Drones currently plugged in, in slot order.
    pub fn occupants(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.slots.iter().flatten().copied()
    }

    /// Drones waiting for a slot, front first.
    pub fn queued(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.queue.iter().copied()
    }

    pub fn is_plugged(&self, drone: EntityId) -> bool {
        self.slots.contains(&Some(drone))
    }

    pub fn is_queued(&self, drone: EntityId) -> bool {
        self.queue.contains(&drone)
    }

    /// Append `drone` to the waiting queue.  A drone already plugged in or
    /// queued here is left where it is.
    pub fn queue_up(&mut self, drone: EntityId) {
        if self.is_plugged(drone) || self.is_queued(drone) {
            debug!(station = %self.id(), %drone, "already docked, ignoring queue_up");
            return;
        }
        self.queue.push_back(drone);
    }

    /// Take `drone` out of its slot, backfilling from the queue.
    ///
    /// Returns `false` if `drone` was not plugged in here.
    pub fn unplug(&mut self, drone: EntityId) -> bool {
        let Some(slot) = self.slots.iter().position(|s| *s == Some(drone)) else {
            return false;
        };
        match self.queue.pop_front() {
            Some(next) => {
                debug!(station = %self.id(), outgoing = %drone, incoming = %next, "slot handed over");
                self.slots[slot] = Some(next);
            }
            None => {
                self.slots[slot] = None;
                self.slots_available += 1;
            }
        }
        true
    }

    /// Remove `drone` from the waiting queue.  Returns `false` if absent.
    pub fn leave_queue(&mut self, drone: EntityId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|&d| d != drone);
        self.queue.len() != before
    }

    /// Detach `drone` from this station entirely (slot or queue).
    pub fn release(&mut self, drone: EntityId) -> bool {
        self.unplug(drone) || self.leave_queue(drone)
    }

    /// One tick: recharge occupants, then fill free slots from the queue.
    pub fn update(&mut self, dt: f64, drones: &mut DroneTable) {
        self.recharge_drones(dt, drones);

        while self.slots_available > 0 {
            let Some(next) = self.queue.pop_front() else { break };
            match self.slots.iter_mut().find(|s| s.is_none()) {
                Some(slot) => *slot = Some(next),
                None => {
                    // Counter and slots disagree; put the drone back and stop.
                    warn!(station = %self.id(), "free-slot count out of sync");
                    self.queue.push_front(next);
                    break;
                }
            }
            self.slots_available -= 1;
        }
    }

    /// Add `charge_rate × dt` to every occupant below capacity.  Occupants
    /// already full are unplugged instead; a drone promoted into that slot
    /// by the unplug is not charged until the next tick.
    pub fn recharge_drones(&mut self, dt: f64, drones: &mut DroneTable) {
        let amount = self.charge_rate * dt;
        for i in 0..self.slots.len() {
            let Some(id) = self.slots[i] else { continue };
            match drones.get_mut(&id) {
                Some(drone) if drone.battery_charge() < f64::from(drone.battery_capacity()) => {
                    drone.recharge(amount);
                }
                Some(_) => {
                    debug!(station = %self.id(), drone = %id, "fully charged, unplugging");
                    self.unplug(id);
                }
                None => {
                    warn!(station = %self.id(), drone = %id, "occupant no longer exists");
                    self.unplug(id);
                }
            }
        }
    }
}

/// The station nearest to `position`, with its position.  Ties go to the
/// lowest id.
pub fn closest_station(stations: &StationTable, position: Vec3) -> Option<(EntityId, Vec3)> {
    let mut best: Option<(EntityId, Vec3, f64)> = None;
    for (&id, station) in stations {
        let d = position.dist(station.position());
        if best.is_none_or(|(_, _, bd)| d < bd) {
            best = Some((id, station.position(), d));
        }
    }
    best.map(|(id, pos, _)| (id, pos))
}
