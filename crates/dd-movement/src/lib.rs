//! `dd-movement` — how mobile entities get from A to B.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                    |
//! |---------------|-------------------------------------------------------------|
//! | [`mobile`]    | `Mobile` — the spatial view a strategy moves                |
//! | [`strategy`]  | `MovementStrategy` trait, `step_toward`, arrival tolerance  |
//! | [`beeline`]   | `BeelineStrategy` — straight line to a fixed target         |
//! | [`path`]      | `PathStrategy` — consume graph waypoints in order           |
//! | [`decorator`] | `SpinDecorator`, `JumpDecorator`                            |
//! | [`factory`]   | `build_strategy` — search name → decorated strategy         |
//!
//! # Motion model
//!
//! Every strategy advances its entity by at most `speed × dt` per call,
//! turning the entity's heading toward the point it is heading for.  A
//! strategy never changes its target once built; decorators wrap a strategy
//! and add a short celebration after arrival without moving the entity off
//! the target.

pub mod beeline;
pub mod decorator;
pub mod factory;
pub mod mobile;
pub mod path;
pub mod strategy;


pub use beeline::BeelineStrategy;
pub use decorator::{JumpDecorator, SpinDecorator, CELEBRATION_SECS};
pub use factory::build_strategy;
pub use mobile::Mobile;
pub use path::PathStrategy;
pub use strategy::{step_toward, MovementStrategy, ARRIVAL_TOLERANCE};
