//! Straight-line movement.

use dd_core::Vec3;

use crate::{step_toward, Mobile, MovementStrategy};

/// Flies straight at a fixed target.
///
/// The line is recomputed from the entity's current position each call, so
/// the strategy works no matter where the entity starts.
#[derive(Debug, Clone)]
pub struct BeelineStrategy {
    target:    Vec3,
    completed: bool,
}

impl BeelineStrategy {
    pub fn new(target: Vec3) -> Self {
        Self { target, completed: false }
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }
}

impl MovementStrategy for BeelineStrategy {
    fn move_entity(&mut self, entity: &mut dyn Mobile, dt: f64) {
        if self.completed {
            return;
        }
        let budget = entity.speed() * dt;
        let (arrived, _) = step_toward(entity, self.target, budget);
        self.completed = arrived;
    }

    fn is_completed(&self) -> bool {
        self.completed
    }
}
