//! CSV routing-graph loader.
//!
//! # CSV format
//!
//! Two files.  Node ids are arbitrary integers; they are remapped to dense
//! `NodeId`s in file order.
//!
//! ```csv
//! id,x,y,z
//! 10,0,270,0
//! 11,120,270,0
//! 12,120,270,80
//! ```
//!
//! ```csv
//! from,to,bidirectional
//! 10,11,true
//! 11,12,
//! ```
//!
//! An empty or missing `bidirectional` column means `true`.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use dd_core::{NodeId, Vec3};

use crate::{RoutingGraph, RoutingGraphBuilder, SpatialError, SpatialResult};

#[derive(Deserialize)]
struct NodeRecord {
    id: u32,
    x:  f64,
    y:  f64,
    z:  f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:          u32,
    to:            u32,
    #[serde(default)]
    bidirectional: Option<bool>,
}

/// Load a routing graph from a nodes CSV and an edges CSV on disk.
pub fn load_graph_csv(nodes: &Path, edges: &Path) -> SpatialResult<RoutingGraph> {
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    load_graph_readers(nodes, edges)
}

/// Like [`load_graph_csv`] but accepts any `Read` sources.
pub fn load_graph_readers<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<RoutingGraph> {
    let mut builder = RoutingGraphBuilder::new();
    let mut ids: HashMap<u32, NodeId> = HashMap::new();

    for record in csv::Reader::from_reader(nodes).deserialize() {
        let rec: NodeRecord = record?;
        if ids.contains_key(&rec.id) {
            return Err(SpatialError::DuplicateNode(rec.id));
        }
        let node = builder.add_node(Vec3::new(rec.x, rec.y, rec.z));
        ids.insert(rec.id, node);
    }

    for record in csv::Reader::from_reader(edges).deserialize() {
        let rec: EdgeRecord = record?;
        let from = *ids.get(&rec.from).ok_or(SpatialError::UnknownNode(rec.from))?;
        let to   = *ids.get(&rec.to).ok_or(SpatialError::UnknownNode(rec.to))?;
        if rec.bidirectional.unwrap_or(true) {
            builder.add_road(from, to);
        } else {
            builder.add_directed_edge(from, to);
        }
    }

    Ok(builder.build())
}
