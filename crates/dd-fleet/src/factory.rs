//! Entity construction from descriptors.
//!
//! Each factory recognizes a set of `type` strings.  For a type it does not
//! recognize a factory returns `Ok(None)` so [`CompositeFactory`] can try the
//! next one; a recognized type with a missing or nonsensical field is an
//! error.

use dd_core::{EntityDescriptor, EntityId};

use crate::{Body, ChargingStation, Drone, Entity, FleetError, FleetResult, Package, Robot};

pub trait EntityFactory: Send + Sync {
    /// Build the entity `desc` describes, or `Ok(None)` if `desc.kind` is
    /// not one of this factory's types.
    fn create(&self, id: EntityId, desc: &EntityDescriptor) -> FleetResult<Option<Entity>>;
}

fn require<T: Copy>(desc: &EntityDescriptor, value: Option<T>, field: &'static str) -> FleetResult<T> {
    value.ok_or_else(|| FleetError::MissingField { kind: desc.kind.clone(), field })
}

fn check_speed(desc: &EntityDescriptor) -> FleetResult<()> {
    let speed = desc.speed_or_default();
    if speed.is_finite() && speed >= 0.0 {
        Ok(())
    } else {
        Err(FleetError::InvalidField {
            kind:   desc.kind.clone(),
            field:  "speed",
            reason: format!("{speed} is not a non-negative number"),
        })
    }
}

// ── Concrete factories ────────────────────────────────────────────────────────

/// `drone`, `lightDrone`, `mediumDrone`, `heavyDrone`.
pub struct DroneFactory;

impl DroneFactory {
    pub const KINDS: [&'static str; 4] = ["drone", "lightDrone", "mediumDrone", "heavyDrone"];
}

impl EntityFactory for DroneFactory {
    fn create(&self, id: EntityId, desc: &EntityDescriptor) -> FleetResult<Option<Entity>> {
        if !Self::KINDS.contains(&desc.kind.as_str()) {
            return Ok(None);
        }
        let battery_cap = require(desc, desc.battery_cap, "battery_cap")?;
        let weight_cap = require(desc, desc.weight_cap, "weight_cap")?;
        check_speed(desc)?;
        let body = Body::from_descriptor(id, desc);
        Ok(Some(Entity::Drone(Drone::new(body, battery_cap, weight_cap))))
    }
}

pub struct PackageFactory;

impl EntityFactory for PackageFactory {
    fn create(&self, id: EntityId, desc: &EntityDescriptor) -> FleetResult<Option<Entity>> {
        if desc.kind != "package" {
            return Ok(None);
        }
        let destination = require(desc, desc.destination, "destination")?;
        let body = Body::from_descriptor(id, desc);
        Ok(Some(Entity::Package(Package::new(body, destination))))
    }
}

pub struct RobotFactory;

impl EntityFactory for RobotFactory {
    fn create(&self, id: EntityId, desc: &EntityDescriptor) -> FleetResult<Option<Entity>> {
        if desc.kind != "robot" {
            return Ok(None);
        }
        Ok(Some(Entity::Robot(Robot::new(Body::from_descriptor(id, desc)))))
    }
}

pub struct ChargingStationFactory;

impl EntityFactory for ChargingStationFactory {
    fn create(&self, id: EntityId, desc: &EntityDescriptor) -> FleetResult<Option<Entity>> {
        if desc.kind != "chargingStation" {
            return Ok(None);
        }
        let slots = require(desc, desc.slots, "slots")?;
        let rate = require(desc, desc.charge_speed, "charge_speed")?;
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(FleetError::InvalidField {
                kind:   desc.kind.clone(),
                field:  "charge_speed",
                reason: format!("{rate} is not a non-negative number"),
            });
        }
        let body = Body::from_descriptor(id, desc);
        Ok(Some(Entity::ChargingStation(ChargingStation::new(body, slots, rate))))
    }
}

// ── Composite ─────────────────────────────────────────────────────────────────

/// Tries each registered factory in order; the first to recognize the type
/// builds the entity.
pub struct CompositeFactory {
    factories: Vec<Box<dyn EntityFactory>>,
}

impl CompositeFactory {
    /// A composite with no factories; every descriptor is unrecognized.
    pub fn empty() -> Self {
        Self { factories: Vec::new() }
    }

    pub fn add(&mut self, factory: impl EntityFactory + 'static) -> &mut Self {
        self.factories.push(Box::new(factory));
        self
    }
}

impl Default for CompositeFactory {
    /// Drones, packages, robots and charging stations.
    fn default() -> Self {
        let mut composite = Self::empty();
        composite
            .add(DroneFactory)
            .add(PackageFactory)
            .add(RobotFactory)
            .add(ChargingStationFactory);
        composite
    }
}

impl EntityFactory for CompositeFactory {
    fn create(&self, id: EntityId, desc: &EntityDescriptor) -> FleetResult<Option<Entity>> {
        for factory in &self.factories {
            if let Some(entity) = factory.create(id, desc)? {
                return Ok(Some(entity));
            }
        }
        Ok(None)
    }
}
