//! Routing graph representation and builder.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** form.  For a
//! `NodeId n`, its outgoing edges are the contiguous EdgeId range
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! Edge arrays are sorted by source node (ties keep insertion order), so the
//! graph-search routers iterate neighbours with a linear scan and their
//! tie-breaking is reproducible.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over the 3-D node positions answers nearest-node
//! queries.  The movement layer uses it to snap arbitrary start/end points
//! onto the graph before routing.

use std::fmt;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use dd_core::{EdgeId, NodeId, Vec3};

use crate::{Router, SpatialError, SpatialResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── RoutingGraph ──────────────────────────────────────────────────────────────

/// Directed routing graph in CSR format plus a spatial index for snapping.
///
/// Fields are `pub` for direct indexed access inside the routers.  Construct
/// with [`RoutingGraphBuilder`].
pub struct RoutingGraph {
    /// Position of each node, indexed by `NodeId`.
    pub node_pos: Vec<Vec3>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge (needed for path reconstruction).
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Euclidean length of each edge.  Used as the Dijkstra / A* cost.
    pub edge_length: Vec<f64>,

    spatial_idx: RTree<NodeEntry>,
}

impl fmt::Debug for RoutingGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

impl RoutingGraph {
    /// A graph with no nodes.  Every routing request against it fails.
    pub fn empty() -> Self {
        RoutingGraphBuilder::new().build()
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// Position of `node`, or `None` if it is out of range.
    pub fn position(&self, node: NodeId) -> Option<Vec3> {
        self.node_pos.get(node.index()).copied()
    }

    pub(crate) fn check_node(&self, node: NodeId) -> SpatialResult<()> {
        if node.index() < self.node_count() {
            Ok(())
        } else {
            Err(SpatialError::NodeNotFound(node))
        }
    }

    /// Iterator over the outgoing edges of `node`, in storage order.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Nearest node to `pos`.  `None` only for an empty graph.
    pub fn snap_to_node(&self, pos: Vec3) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y, pos.z])
            .map(|e| e.id)
    }

    /// Waypoints for travelling from `start` to `end` over the graph.
    ///
    /// Both points are snapped to their nearest nodes and routed with
    /// `router`.  The result lists the route's node positions followed by
    /// `end` itself, so a mover that consumes every waypoint finishes exactly
    /// on the requested point.
    pub fn path_points(
        &self,
        router: &dyn Router,
        start:  Vec3,
        end:    Vec3,
    ) -> SpatialResult<Vec<Vec3>> {
        let from = self.snap_to_node(start).ok_or(SpatialError::EmptyGraph)?;
        let to   = self.snap_to_node(end).ok_or(SpatialError::EmptyGraph)?;
        let route = router.route(self, from, to)?;

        let mut points: Vec<Vec3> = route
            .nodes
            .iter()
            .map(|n| self.node_pos[n.index()])
            .collect();
        points.push(end);
        Ok(points)
    }
}

// ── RoutingGraphBuilder ───────────────────────────────────────────────────────

/// Construct a [`RoutingGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use dd_core::Vec3;
/// use dd_spatial::RoutingGraphBuilder;
///
/// let mut b = RoutingGraphBuilder::new();
/// let a = b.add_node(Vec3::new(0.0, 0.0, 0.0));
/// let c = b.add_node(Vec3::new(30.0, 0.0, 40.0));
/// b.add_road(a, c);
/// let graph = b.build();
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.edge_length[0], 50.0);
/// ```
#[derive(Default)]
pub struct RoutingGraphBuilder {
    nodes:     Vec<Vec3>,
    raw_edges: Vec<(NodeId, NodeId)>,
}

impl RoutingGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Vec3) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge.  Its length is the Euclidean distance between
    /// the two node positions, computed at `build` time.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId) {
        self.raw_edges.push((from, to));
    }

    /// Add edges in both directions.
    pub fn add_road(&mut self, a: NodeId, b: NodeId) {
        self.add_directed_edge(a, b);
        self.add_directed_edge(b, a);
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoutingGraph`].
    pub fn build(self) -> RoutingGraph {
        let node_count = self.nodes.len();

        // Stable sort keeps insertion order among a node's outgoing edges.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|(from, _)| from.0);

        let edge_from: Vec<NodeId> = raw.iter().map(|&(f, _)| f).collect();
        let edge_to:   Vec<NodeId> = raw.iter().map(|&(_, t)| t).collect();
        let edge_length: Vec<f64> = raw
            .iter()
            .map(|&(f, t)| self.nodes[f.index()].dist(self.nodes[t.index()]))
            .collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for (from, _) in &raw {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, raw.len());

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, p)| NodeEntry {
                point: [p.x, p.y, p.z],
                id:    NodeId(i as u32),
            })
            .collect();

        RoutingGraph {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length,
            spatial_idx: RTree::bulk_load(entries),
        }
    }
}
