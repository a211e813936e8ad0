//! `dd-sim` — the simulation model for the drone delivery simulator.
//!
//! # Tick loop
//!
//! ```text
//! update(dt):
//!   ① Entities   — update every entity in id order; controller.update_entity
//!   ② Telemetry  — UpdateBatteries, then DeliveryCompleted per hand-off
//!   ③ Removals   — sweep ids marked by remove_entity, detach references
//!   ④ Matching   — greedy assignment of queued packages to drones
//!   clock.advance(dt); controller.on_tick_end(summary)
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`model`]      | `SimulationModel<C>` — registry owner and tick loop        |
//! | [`matching`]   | `select_drone`, the per-tick matching pass                 |
//! | [`registry`]   | `Registry` — typed entity tables and the name index        |
//! | [`controller`] | `Controller` trait, `SimEvent`, `EntityView`, `TickSummary`|
//! | [`builder`]    | `SimBuilder`                                               |
//! | [`error`]      | `SimError`, `SimResult<T>`                                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use dd_core::{EntityDescriptor, SimConfig, TripRequest, Vec3};
//! use dd_sim::{NoopController, SimBuilder};
//!
//! let mut model = SimBuilder::new(SimConfig::default(), NoopController)
//!     .entity(EntityDescriptor::charging_station("cs", Vec3::ZERO, 1, 50.0))
//!     .entity(EntityDescriptor::drone("d", Vec3::ZERO, 3_000, 10))
//!     .entity(EntityDescriptor::robot("amy", Vec3::new(200.0, 0.0, 0.0)))
//!     .entity(EntityDescriptor::package("amy_package", Vec3::new(50.0, 0.0, 0.0), Vec3::new(200.0, 0.0, 0.0)))
//!     .trip(TripRequest::new("amy", 2, "astar"))
//!     .build()?;
//! model.run_ticks(1_000);
//! ```

pub mod builder;
pub mod controller;
pub mod error;
pub mod matching;
pub mod model;
pub mod registry;


pub use builder::SimBuilder;
pub use controller::{
    Controller, EntityView, NoopController, RecordingController, SimEvent, TickSummary,
};
pub use error::{SimError, SimResult};
pub use matching::{select_drone, MatchStats, Selection};
pub use model::SimulationModel;
pub use registry::Registry;
