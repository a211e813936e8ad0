//! Greedy package-to-drone assignment, run once per tick.
//!
//! # Algorithm
//!
//! The delivery queue is walked front to back for the length it had when
//! the pass started; packages re-queued during the pass go to the back and
//! wait for the next tick.  For each package:
//!
//! 1. `end_station` = station closest to the package's destination.  With
//!    no stations the package is re-queued.
//! 2. `baseline` = `|pickup → destination| + |destination → end_station|`.
//! 3. Every available drone is scanned.  A drone is a candidate when
//!    `weight_capacity > weight` and `battery_capacity > total`, where
//!    `total = |drone → pickup| + baseline`.
//! 4. Candidates whose current `battery_charge > total` form the *charged*
//!    tier; the rest form the *waiting* tier.  The winner is the minimum
//!    `total / speed` in the charged tier, or failing that in the waiting
//!    tier.  Ties keep the lowest id.
//! 5. The winner gets the delivery with `charge_required = total`.
//!
//! If a package finds no available drone at all, it is re-queued and the
//! rest of the pass is skipped.  If drones were available but none
//! qualified, it is re-queued and the pass moves on.

use std::collections::VecDeque;

use tracing::{debug, info};

use dd_core::{EntityId, Vec3};
use dd_fleet::{closest_station, DroneTable};
use dd_spatial::RoutingGraph;

use crate::Registry;

/// Outcome of scanning the fleet for one package.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Selection {
    /// No drone was available.
    NoDrones,
    /// Drones were available but none met the weight and battery limits.
    NoCandidate,
    Matched {
        drone:          EntityId,
        /// Drone → pickup → destination → end station.
        total_distance: f64,
        /// `true` when the drone must charge before it can leave.
        must_wait:      bool,
    },
}

#[derive(Copy, Clone, Debug)]
struct Candidate {
    drone:       EntityId,
    total:       f64,
    travel_time: f64,
}

/// Choose a drone for a package picked up at `pickup`.
///
/// `baseline` is the pickup → destination → end-station distance.  Drones
/// that cannot move (`speed <= 0`) count as available but never qualify.
pub fn select_drone(drones: &DroneTable, pickup: Vec3, baseline: f64, weight: u32) -> Selection {
    let mut available = 0usize;
    let mut charged: Option<Candidate> = None;
    let mut waiting: Option<Candidate> = None;

    for (&id, drone) in drones {
        if !drone.is_available() {
            continue;
        }
        available += 1;

        if weight >= drone.weight_capacity() || drone.speed() <= 0.0 {
            continue;
        }
        let total = drone.position().dist(pickup) + baseline;
        if f64::from(drone.battery_capacity()) <= total {
            continue;
        }

        let candidate = Candidate { drone: id, total, travel_time: total / drone.speed() };
        let tier = if drone.battery_charge() > total { &mut charged } else { &mut waiting };
        if tier.is_none_or(|best| candidate.travel_time < best.travel_time) {
            *tier = Some(candidate);
        }
    }

    if available == 0 {
        return Selection::NoDrones;
    }
    match (charged, waiting) {
        (Some(c), _) => Selection::Matched { drone: c.drone, total_distance: c.total, must_wait: false },
        (None, Some(w)) => Selection::Matched { drone: w.drone, total_distance: w.total, must_wait: true },
        (None, None) => Selection::NoCandidate,
    }
}

/// Counters from one matching pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    pub matched:   usize,
    pub requeued:  usize,
    /// The pass stopped early because no drone was available.
    pub halted:    bool,
}

/// Run one matching pass over `deliveries`.
pub(crate) fn run_matching(
    registry:   &mut Registry,
    deliveries: &mut VecDeque<EntityId>,
    graph:      Option<&RoutingGraph>,
) -> MatchStats {
    let mut stats = MatchStats::default();

    for _ in 0..deliveries.len() {
        let Some(package_id) = deliveries.pop_front() else { break };
        let Some(package) = registry.packages.get_mut(&package_id) else {
            debug!(package = %package_id, "queued package no longer exists, dropping");
            continue;
        };

        let destination = package.destination();
        let Some((station, station_pos)) = closest_station(&registry.stations, destination) else {
            debug!(package = %package_id, "no charging station, re-queueing");
            deliveries.push_back(package_id);
            stats.requeued += 1;
            continue;
        };
        let baseline = package.position().dist(destination) + destination.dist(station_pos);

        match select_drone(&registry.drones, package.position(), baseline, package.weight()) {
            Selection::NoDrones => {
                deliveries.push_back(package_id);
                stats.requeued += 1;
                stats.halted = true;
                break;
            }
            Selection::NoCandidate => {
                deliveries.push_back(package_id);
                stats.requeued += 1;
            }
            Selection::Matched { drone, total_distance, must_wait } => {
                let Some(d) = registry.drones.get_mut(&drone) else { continue };
                d.set_next_delivery(package, total_distance, (station, station_pos), graph);
                stats.matched += 1;
                info!(
                    package = %package_id,
                    %drone,
                    %station,
                    total_distance,
                    must_wait,
                    "delivery matched"
                );
            }
        }
    }
    stats
}
