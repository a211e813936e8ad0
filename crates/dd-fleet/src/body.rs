//! Spatial attributes shared by every entity.

use dd_core::{EntityDescriptor, EntityId, Vec3};
use dd_movement::Mobile;

/// Identity, label and pose of one entity.
///
/// `kind` keeps the descriptor's `type` string verbatim (e.g. `"lightDrone"`)
/// so the view layer can pick a model for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id:        EntityId,
    pub name:      String,
    pub kind:      String,
    pub position:  Vec3,
    pub direction: Vec3,
    pub speed:     f64,
}

impl Body {
    pub fn from_descriptor(id: EntityId, desc: &EntityDescriptor) -> Self {
        Self {
            id,
            name:      desc.name.clone(),
            kind:      desc.kind.clone(),
            position:  desc.position,
            direction: desc.direction,
            speed:     desc.speed_or_default(),
        }
    }
}

impl Mobile for Body {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn direction(&self) -> Vec3 {
        self.direction
    }

    fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction;
    }

    fn speed(&self) -> f64 {
        self.speed
    }
}
