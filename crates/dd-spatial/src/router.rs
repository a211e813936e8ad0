//! Routing trait and the four graph-search routers.
//!
//! # Pluggability
//!
//! The movement layer calls routing through the [`Router`] trait, so any
//! search can be swapped in without touching drones or the model.  The four
//! built-in routers correspond to the recognized trip `search` names:
//!
//! | Router           | Objective                               |
//! |------------------|-----------------------------------------|
//! | `DijkstraRouter` | minimum total edge length               |
//! | `AStarRouter`    | minimum total edge length, Euclidean heuristic |
//! | `BfsRouter`      | fewest edges                            |
//! | `DfsRouter`      | first path found, depth-first           |
//!
//! All routers expand neighbours in CSR storage order and break cost ties by
//! `NodeId`, so a given graph always yields the same route.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, VecDeque};

use dd_core::{EdgeId, NodeId, SearchStrategy};

use crate::network::RoutingGraph;
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes visited in order, starting with the source and ending with the
    /// destination.  A trivial route holds just the one node.
    pub nodes: Vec<NodeId>,
    /// Edges traversed in order.
    pub edges: Vec<EdgeId>,
    /// Sum of edge lengths.
    pub total_length: f64,
}

impl Route {
    /// `true` if source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable graph search.
pub trait Router: Send + Sync {
    /// Compute a route from `from` to `to`.
    ///
    /// `from == to` yields a trivial route; an unreachable destination is
    /// [`SpatialError::NoRoute`].
    fn route(&self, graph: &RoutingGraph, from: NodeId, to: NodeId) -> SpatialResult<Route>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}

/// The router backing a trip search strategy, or `None` for `Beeline`.
pub fn router_for(strategy: SearchStrategy) -> Option<&'static dyn Router> {
    match strategy {
        SearchStrategy::AStar    => Some(&AStarRouter),
        SearchStrategy::Dijkstra => Some(&DijkstraRouter),
        SearchStrategy::Bfs      => Some(&BfsRouter),
        SearchStrategy::Dfs      => Some(&DfsRouter),
        SearchStrategy::Beeline  => None,
    }
}

pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &RoutingGraph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        best_first(graph, from, to, |_| 0.0)
    }

    fn name(&self) -> &'static str {
        "dijkstra"
    }
}

pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(&self, graph: &RoutingGraph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        let goal = graph.position(to).ok_or(SpatialError::NodeNotFound(to))?;
        best_first(graph, from, to, |n| graph.node_pos[n.index()].dist(goal))
    }

    fn name(&self) -> &'static str {
        "astar"
    }
}

pub struct BfsRouter;

impl Router for BfsRouter {
    fn route(&self, graph: &RoutingGraph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        graph.check_node(from)?;
        graph.check_node(to)?;
        if from == to {
            return Ok(trivial(from));
        }

        let mut prev_edge = vec![EdgeId::INVALID; graph.node_count()];
        let mut seen      = vec![false; graph.node_count()];
        let mut frontier  = VecDeque::from([from]);
        seen[from.index()] = true;

        while let Some(node) = frontier.pop_front() {
            for edge in graph.out_edges(node) {
                let next = graph.edge_to[edge.index()];
                if seen[next.index()] {
                    continue;
                }
                seen[next.index()] = true;
                prev_edge[next.index()] = edge;
                if next == to {
                    return Ok(reconstruct(graph, &prev_edge, from, to));
                }
                frontier.push_back(next);
            }
        }

        Err(SpatialError::NoRoute { from, to })
    }

    fn name(&self) -> &'static str {
        "bfs"
    }
}

pub struct DfsRouter;

impl Router for DfsRouter {
    fn route(&self, graph: &RoutingGraph, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        graph.check_node(from)?;
        graph.check_node(to)?;
        if from == to {
            return Ok(trivial(from));
        }

        let mut prev_edge = vec![EdgeId::INVALID; graph.node_count()];
        let mut visited   = vec![false; graph.node_count()];
        // (node, edge used to reach it)
        let mut stack = vec![(from, EdgeId::INVALID)];

        while let Some((node, via)) = stack.pop() {
            if visited[node.index()] {
                continue;
            }
            visited[node.index()] = true;
            prev_edge[node.index()] = via;
            if node == to {
                return Ok(reconstruct(graph, &prev_edge, from, to));
            }
            // Reverse push so the first stored edge is explored first.
            let edges: Vec<EdgeId> = graph.out_edges(node).collect();
            for &edge in edges.iter().rev() {
                let next = graph.edge_to[edge.index()];
                if !visited[next.index()] {
                    stack.push((next, edge));
                }
            }
        }

        Err(SpatialError::NoRoute { from, to })
    }

    fn name(&self) -> &'static str {
        "dfs"
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Non-negative path cost with a total order for the binary heap.
#[derive(Copy, Clone, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

fn trivial(node: NodeId) -> Route {
    Route { nodes: vec![node], edges: vec![], total_length: 0.0 }
}

/// Dijkstra with an optional admissible heuristic (`|_| 0.0` for plain
/// Dijkstra).  Heap entries are `(g + h, node)`; `NodeId` is the tie-breaker.
fn best_first<H>(graph: &RoutingGraph, from: NodeId, to: NodeId, heuristic: H) -> SpatialResult<Route>
where
    H: Fn(NodeId) -> f64,
{
    graph.check_node(from)?;
    graph.check_node(to)?;
    if from == to {
        return Ok(trivial(from));
    }

    let n = graph.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    dist[from.index()] = 0.0;

    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(heuristic(from)), from)));

    while let Some(Reverse((Cost(priority), node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(graph, &prev_edge, from, to));
        }

        let g = dist[node.index()];
        // Skip stale heap entries.
        if priority > g + heuristic(node) {
            continue;
        }

        for edge in graph.out_edges(node) {
            let next = graph.edge_to[edge.index()];
            let candidate = g + graph.edge_length[edge.index()];
            if candidate < dist[next.index()] {
                dist[next.index()] = candidate;
                prev_edge[next.index()] = edge;
                heap.push(Reverse((Cost(candidate + heuristic(next)), next)));
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(graph: &RoutingGraph, prev_edge: &[EdgeId], from: NodeId, to: NodeId) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        debug_assert_ne!(e, EdgeId::INVALID, "broken predecessor chain at {cur}");
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| graph.edge_to[e.index()]));
    let total_length = edges.iter().map(|e| graph.edge_length[e.index()]).sum();

    Route { nodes, edges, total_length }
}
