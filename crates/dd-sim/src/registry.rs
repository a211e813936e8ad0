//! Entity storage: one id-ordered table per kind plus a name index.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use dd_core::EntityId;
use dd_fleet::{
    DroneTable, Entity, EntityKind, PackageTable, RobotTable, StationTable,
};

use crate::EntityView;

/// Owns every entity in the model.
///
/// `kinds` is the master list: iterating it visits every entity in
/// ascending id (creation) order.  The typed tables hold the entities
/// themselves; because they are separate fields, one table can be borrowed
/// mutably while another is lent out.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) kinds:    BTreeMap<EntityId, EntityKind>,
    pub(crate) drones:   DroneTable,
    pub(crate) packages: PackageTable,
    pub(crate) robots:   RobotTable,
    pub(crate) stations: StationTable,
    /// Name → ids carrying that name, ascending.
    names:               FxHashMap<String, Vec<EntityId>>,
    next_id:             u32,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// The id the next inserted entity will receive.
    pub fn peek_id(&self) -> EntityId {
        EntityId(self.next_id)
    }

    pub fn kind(&self, id: EntityId) -> Option<EntityKind> {
        self.kinds.get(&id).copied()
    }

    /// Ids of every entity named `name`, ascending.
    pub fn named(&self, name: &str) -> &[EntityId] {
        self.names.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// File `entity` under its id.  Ids must come from [`peek_id`](Self::peek_id).
    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        debug_assert_eq!(id, self.peek_id(), "ids are handed out in order");
        self.next_id = id.0 + 1;

        self.kinds.insert(id, entity.kind());
        let name = entity.body().name.clone();
        let ids = self.names.entry(name).or_default();
        if let Err(pos) = ids.binary_search(&id) {
            ids.insert(pos, id);
        }

        match entity {
            Entity::Drone(d)           => { self.drones.insert(id, d); }
            Entity::Package(p)         => { self.packages.insert(id, p); }
            Entity::Robot(r)           => { self.robots.insert(id, r); }
            Entity::ChargingStation(s) => { self.stations.insert(id, s); }
        }
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let kind = self.kinds.remove(&id)?;
        let entity = match kind {
            EntityKind::Drone           => self.drones.remove(&id).map(Entity::Drone),
            EntityKind::Package         => self.packages.remove(&id).map(Entity::Package),
            EntityKind::Robot           => self.robots.remove(&id).map(Entity::Robot),
            EntityKind::ChargingStation => self.stations.remove(&id).map(Entity::ChargingStation),
        }?;

        let name = &entity.body().name;
        if let Some(ids) = self.names.get_mut(name) {
            ids.retain(|&i| i != id);
            if ids.is_empty() {
                self.names.remove(name);
            }
        }
        Some(entity)
    }

    /// View-layer snapshot of entity `id`.
    pub fn view(&self, id: EntityId) -> Option<EntityView> {
        match self.kind(id)? {
            EntityKind::Drone => self.drones.get(&id).map(|d| EntityView {
                battery_percent: Some(d.battery_percent()),
                available:       Some(d.is_available()),
                ..EntityView::of(EntityKind::Drone, &d.body)
            }),
            EntityKind::Package => self.packages.get(&id).map(|p| EntityView::of(EntityKind::Package, &p.body)),
            EntityKind::Robot => self.robots.get(&id).map(|r| EntityView::of(EntityKind::Robot, &r.body)),
            EntityKind::ChargingStation => {
                self.stations.get(&id).map(|s| EntityView::of(EntityKind::ChargingStation, &s.body))
            }
        }
    }
}

impl EntityView {
    pub(crate) fn of(kind: EntityKind, body: &dd_fleet::Body) -> Self {
        Self {
            id:              body.id,
            kind,
            type_name:       body.kind.clone(),
            name:            body.name.clone(),
            position:        body.position,
            direction:       body.direction,
            battery_percent: None,
            available:       None,
        }
    }

    /// View of an entity already taken out of the registry.
    pub(crate) fn of_entity(entity: &Entity) -> Self {
        Self::of(entity.kind(), entity.body())
    }
}
