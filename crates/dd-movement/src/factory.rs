//! Strategy construction from a search name.

use tracing::warn;

use dd_core::{SearchStrategy, Vec3};
use dd_spatial::{router_for, RoutingGraph};

use crate::{BeelineStrategy, JumpDecorator, MovementStrategy, PathStrategy, SpinDecorator};

/// Build the strategy a drone uses to carry a package from `start` to `end`.
///
/// | Search     | Strategy                         |
/// |------------|----------------------------------|
/// | `astar`    | `Jump(A* path)`                  |
/// | `dfs`      | `Spin(Jump(DFS path))`           |
/// | `bfs`      | `Spin(Spin(BFS path))`           |
/// | `dijkstra` | `Jump(Spin(Dijkstra path))`      |
/// | other      | `Beeline`                        |
///
/// Graph strategies without a graph, or whose route cannot be found, follow
/// a single-waypoint path straight to `end` (still decorated).
pub fn build_strategy(
    kind:  SearchStrategy,
    start: Vec3,
    end:   Vec3,
    graph: Option<&RoutingGraph>,
) -> Box<dyn MovementStrategy> {
    let decorate: fn(Box<dyn MovementStrategy>) -> Box<dyn MovementStrategy> = match kind {
        SearchStrategy::Beeline  => return Box::new(BeelineStrategy::new(end)),
        SearchStrategy::AStar    => jump,
        SearchStrategy::Dfs      => |path| spin(jump(path)),
        SearchStrategy::Bfs      => |path| spin(spin(path)),
        SearchStrategy::Dijkstra => |path| jump(spin(path)),
    };

    let waypoints = match (graph, router_for(kind)) {
        (Some(graph), Some(router)) => graph.path_points(router, start, end).unwrap_or_else(|e| {
            warn!(router = router.name(), %start, %end, error = %e, "routing failed, flying direct");
            vec![end]
        }),
        _ => {
            warn!(search = %kind, "no routing graph, flying direct");
            vec![end]
        }
    };
    decorate(Box::new(PathStrategy::new(waypoints)))
}

fn spin(inner: Box<dyn MovementStrategy>) -> Box<dyn MovementStrategy> {
    Box::new(SpinDecorator::new(inner))
}

fn jump(inner: Box<dyn MovementStrategy>) -> Box<dyn MovementStrategy> {
    Box::new(JumpDecorator::new(inner))
}
