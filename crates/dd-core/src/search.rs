//! Routing strategy names shared by trip requests, packages, and the
//! movement layer.
//!
//! Trip requests carry the strategy as a free-form string.  Anything outside
//! the recognized set resolves to [`SearchStrategy::Beeline`], so an unknown
//! name is never an error.

/// How a drone travels from a package to its destination.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum SearchStrategy {
    /// Straight line, ignoring the routing graph.
    #[default]
    Beeline,
    /// A* over the routing graph (Euclidean heuristic).
    AStar,
    /// Dijkstra over the routing graph.
    Dijkstra,
    /// Breadth-first search (fewest hops).
    Bfs,
    /// Depth-first search (first path found).
    Dfs,
}

impl SearchStrategy {
    /// Resolve a strategy name.  Unrecognized names fall back to `Beeline`.
    pub fn from_name(name: &str) -> SearchStrategy {
        match name {
            "astar"    => SearchStrategy::AStar,
            "dijkstra" => SearchStrategy::Dijkstra,
            "bfs"      => SearchStrategy::Bfs,
            "dfs"      => SearchStrategy::Dfs,
            _          => SearchStrategy::Beeline,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SearchStrategy::Beeline  => "beeline",
            SearchStrategy::AStar    => "astar",
            SearchStrategy::Dijkstra => "dijkstra",
            SearchStrategy::Bfs      => "bfs",
            SearchStrategy::Dfs      => "dfs",
        }
    }
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
