//! The `MovementStrategy` contract and the shared stepping rule.

use dd_core::Vec3;

use crate::Mobile;

/// Distance below which an entity counts as having reached a point.
pub const ARRIVAL_TOLERANCE: f64 = 1e-3;

/// Moves a mobile entity toward a fixed target and reports completion.
///
/// Implementations own their target (and any waypoints) from construction
/// on.  `move_entity` after completion is a no-op for the base strategies.
pub trait MovementStrategy: Send {
    /// Advance `entity` by at most `entity.speed() * dt`.
    fn move_entity(&mut self, entity: &mut dyn Mobile, dt: f64);

    /// `true` once the entity has reached the target (and, for decorators,
    /// once their post-arrival effect has finished).
    fn is_completed(&self) -> bool;
}

/// Move `entity` toward `target` using at most `budget` distance.
///
/// Returns `(arrived, used)`.  On arrival the entity is placed exactly on
/// `target`.  The heading is updated to face `target` whenever the entity
/// actually moves.
pub fn step_toward(entity: &mut dyn Mobile, target: Vec3, budget: f64) -> (bool, f64) {
    let pos = entity.position();
    let offset = target - pos;
    let remaining = offset.magnitude();

    if remaining <= ARRIVAL_TOLERANCE {
        entity.set_position(target);
        return (true, remaining);
    }

    let step = budget.max(0.0).min(remaining);
    let heading = offset * (1.0 / remaining);
    entity.set_direction(heading);

    if remaining - step <= ARRIVAL_TOLERANCE {
        entity.set_position(target);
        (true, step)
    } else {
        entity.set_position(pos + heading * step);
        (false, step)
    }
}
