//! The closed set of entity kinds.

use dd_core::EntityId;

use crate::{Body, ChargingStation, Drone, Package, Robot};

/// Discriminant of an [`Entity`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Drone,
    Package,
    Robot,
    ChargingStation,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            EntityKind::Drone           => "drone",
            EntityKind::Package         => "package",
            EntityKind::Robot           => "robot",
            EntityKind::ChargingStation => "chargingStation",
        })
    }
}

/// A freshly built entity, before the model files it into its table.
#[derive(Debug)]
pub enum Entity {
    Drone(Drone),
    Package(Package),
    Robot(Robot),
    ChargingStation(ChargingStation),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Drone(_)           => EntityKind::Drone,
            Entity::Package(_)         => EntityKind::Package,
            Entity::Robot(_)           => EntityKind::Robot,
            Entity::ChargingStation(_) => EntityKind::ChargingStation,
        }
    }

    pub fn body(&self) -> &Body {
        match self {
            Entity::Drone(d)           => &d.body,
            Entity::Package(p)         => &p.body,
            Entity::Robot(r)           => &r.body,
            Entity::ChargingStation(s) => &s.body,
        }
    }

    pub fn id(&self) -> EntityId {
        self.body().id
    }
}
