//! `dd-spatial` — routing graph, spatial snapping, and graph search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                       |
//! |-------------|----------------------------------------------------------------|
//! | [`network`] | `RoutingGraph` (CSR + R-tree), `RoutingGraphBuilder`           |
//! | [`router`]  | `Router` trait, `Route`, Dijkstra / A* / BFS / DFS routers     |
//! | [`loader`]  | `load_graph_csv`, `load_graph_readers`                         |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                             |
//!
//! The movement layer only sees this crate through [`Router`] and
//! [`RoutingGraph::path_points`]; how each router searches is its own
//! business.

pub mod error;
pub mod loader;
pub mod network;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use loader::{load_graph_csv, load_graph_readers};
pub use network::{RoutingGraph, RoutingGraphBuilder};
pub use router::{router_for, AStarRouter, BfsRouter, DfsRouter, DijkstraRouter, Route, Router};
