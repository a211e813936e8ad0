//! The spatial surface a movement strategy operates on.

use dd_core::Vec3;

/// Anything with a position, a heading, and a travel speed.
///
/// Drones implement this; strategies take `&mut dyn Mobile` so one boxed
/// strategy type can drive any entity.
pub trait Mobile {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    fn direction(&self) -> Vec3;
    fn set_direction(&mut self, direction: Vec3);
    /// Units travelled per simulated second.
    fn speed(&self) -> f64;
}
