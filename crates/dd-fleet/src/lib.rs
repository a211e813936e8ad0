//! `dd-fleet` — the entities of the delivery world.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`body`]    | `Body` — id, name, kind label, pose, speed                    |
//! | [`drone`]   | `Drone` state machine, `DroneState`, `Handoff`                |
//! | [`station`] | `ChargingStation` slots + queue, `closest_station`            |
//! | [`package`] | `Package`                                                     |
//! | [`robot`]   | `Robot` — delivery requester                                  |
//! | [`entity`]  | `Entity` enum, `EntityKind`                                   |
//! | [`context`] | `FleetContext<'a>` — tables lent to a drone during its update |
//! | [`factory`] | `EntityFactory` trait, per-kind factories, `CompositeFactory` |
//! | [`error`]   | `FleetError`, `FleetResult<T>`                                |
//!
//! # Ownership
//!
//! Entities refer to each other only by [`EntityId`].  Each kind lives in
//! its own id-ordered table (`DroneTable`, `PackageTable`, …) owned by the
//! simulation model, which lends the tables a given update needs.

use std::collections::BTreeMap;

use dd_core::EntityId;

pub mod body;
pub mod context;
pub mod drone;
pub mod entity;
pub mod error;
pub mod factory;
pub mod package;
pub mod robot;
pub mod station;

#[cfg(test)]
mod tests;

pub use body::Body;
pub use context::FleetContext;
pub use drone::{Drone, DroneState, Handoff};
pub use entity::{Entity, EntityKind};
pub use error::{FleetError, FleetResult};
pub use factory::{
    ChargingStationFactory, CompositeFactory, DroneFactory, EntityFactory, PackageFactory,
    RobotFactory,
};
pub use package::Package;
pub use robot::Robot;
pub use station::{closest_station, ChargingStation};

// ── Tables ────────────────────────────────────────────────────────────────────

pub type DroneTable   = BTreeMap<EntityId, Drone>;
pub type PackageTable = BTreeMap<EntityId, Package>;
pub type RobotTable   = BTreeMap<EntityId, Robot>;
pub type StationTable = BTreeMap<EntityId, ChargingStation>;
