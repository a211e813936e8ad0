//! Waypoint-following movement for graph-search strategies.

use dd_core::Vec3;

use crate::{step_toward, Mobile, MovementStrategy};

/// Visits a precomputed list of waypoints in order.
///
/// Distance budget left over after reaching a waypoint carries on toward
/// the next one within the same call, so total travel per call is still
/// bounded by `speed × dt`.  An empty path is complete from the start.
#[derive(Debug, Clone)]
pub struct PathStrategy {
    path:  Vec<Vec3>,
    index: usize,
}

impl PathStrategy {
    pub fn new(path: Vec<Vec3>) -> Self {
        Self { path, index: 0 }
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.path
    }

    /// The waypoint currently being approached, `None` once finished.
    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.path.get(self.index).copied()
    }
}

impl MovementStrategy for PathStrategy {
    fn move_entity(&mut self, entity: &mut dyn Mobile, dt: f64) {
        let mut budget = entity.speed() * dt;
        while let Some(target) = self.current_waypoint() {
            let (arrived, used) = step_toward(entity, target, budget);
            if !arrived {
                break;
            }
            // Coincident waypoints are consumed even with no budget left.
            self.index += 1;
            budget = (budget - used).max(0.0);
        }
    }

    fn is_completed(&self) -> bool {
        self.index >= self.path.len()
    }
}
