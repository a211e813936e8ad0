//! `dd-core` — foundational types for the drone delivery simulator.
//!
//! Every other `dd-*` crate depends on this one.  It has no `dd-*`
//! dependencies and only a handful of external ones (`rand`, `serde`,
//! `thiserror`).
//!
//! # What lives here
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`ids`]        | `EntityId`, `NodeId`, `EdgeId`                          |
//! | [`geo`]        | `Vec3`, Euclidean distance, heading rotation            |
//! | [`time`]       | `Tick`, `SimClock`, `SimConfig`                         |
//! | [`search`]     | `SearchStrategy` (routing strategy names)               |
//! | [`descriptor`] | `EntityDescriptor`, `TripRequest`                       |
//! | [`rng`]        | `SimRng` (seeded scenario randomness)                   |
//! | [`error`]      | `DdError`, `DdResult`                                   |

pub mod descriptor;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod search;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use descriptor::{EntityDescriptor, TripRequest};
pub use error::{DdError, DdResult};
pub use geo::Vec3;
pub use ids::{EdgeId, EntityId, NodeId};
pub use rng::SimRng;
pub use search::SearchStrategy;
pub use time::{SimClock, SimConfig, Tick};
