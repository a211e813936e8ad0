//! Scenario files and the generated default scenario.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use dd_core::{EntityDescriptor, SimConfig, SimRng, TripRequest, Vec3};
use dd_spatial::{load_graph_csv, RoutingGraph, RoutingGraphBuilder};

// ── Generated layout ──────────────────────────────────────────────────────────

const GRID_SIDE:      usize = 9;
const GRID_SPACING:   f64   = 100.0;
const ALTITUDE:       f64   = 270.0;
const STATION_COUNT:  usize = 3;
const DRONE_COUNT:    usize = 6;
const REQUEST_COUNT:  usize = 12;
const SEARCHES:       [&str; 5] = ["astar", "dijkstra", "bfs", "dfs", "beeline"];
const DRONE_TYPES:    [(&str, f64, u32, u32); 3] = [
    // type, speed, battery_cap, weight_cap
    ("lightDrone",  40.0, 3_000, 6),
    ("mediumDrone", 30.0, 4_000, 12),
    ("heavyDrone",  20.0, 6_000, 25),
];

/// Graph CSV paths, relative to the scenario file.
#[derive(Debug, Deserialize)]
pub struct GraphFiles {
    pub nodes: PathBuf,
    pub edges: PathBuf,
}

/// Everything needed to build a model.
#[derive(Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config:   SimConfig,
    pub entities: Vec<EntityDescriptor>,
    #[serde(default)]
    pub trips:    Vec<TripRequest>,
    #[serde(default)]
    pub graph:    Option<GraphFiles>,
    /// Loaded from `graph` or generated; never part of the file.
    #[serde(skip)]
    pub routing:  Option<RoutingGraph>,
}

impl Scenario {
    /// Read a scenario JSON file and the graph CSVs it names.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let mut scenario: Scenario = serde_json::from_str(&text)
            .with_context(|| format!("parsing scenario {}", path.display()))?;

        if let Some(files) = &scenario.graph {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            let nodes = base.join(&files.nodes);
            let edges = base.join(&files.edges);
            let graph = load_graph_csv(&nodes, &edges)
                .with_context(|| format!("loading graph {} / {}", nodes.display(), edges.display()))?;
            scenario.routing = Some(graph);
        }
        Ok(scenario)
    }

    /// A grid city with stations, a mixed fleet, and one request per robot.
    pub fn generate(seed: u64) -> Self {
        let mut rng = SimRng::new(seed);
        let half = GRID_SPACING * (GRID_SIDE - 1) as f64 / 2.0;
        let mut entities = Vec::new();
        let mut trips = Vec::new();

        let mut station_rng = rng.child(1);
        let stations: Vec<Vec3> = (0..STATION_COUNT)
            .map(|i| {
                let pos = station_rng.ground_point(half, ALTITUDE);
                entities.push(EntityDescriptor::charging_station(format!("station-{i}"), pos, 2, 40.0));
                pos
            })
            .collect();

        let mut drone_rng = rng.child(2);
        for i in 0..DRONE_COUNT {
            let (kind, speed, battery, weight) = DRONE_TYPES[i % DRONE_TYPES.len()];
            let home = drone_rng.choose(&stations).copied().unwrap_or(Vec3::ZERO);
            entities.push(EntityDescriptor {
                kind: kind.to_owned(),
                ..EntityDescriptor::drone(format!("drone-{i}"), home, battery, weight).with_speed(speed)
            });
        }

        let mut request_rng = rng.child(3);
        for i in 0..REQUEST_COUNT {
            let name = format!("robot-{i}");
            let start = request_rng.ground_point(half, ALTITUDE);
            let end = request_rng.ground_point(half, ALTITUDE);
            let search = request_rng.choose(&SEARCHES).copied().unwrap_or("beeline");
            let weight = request_rng.gen_range(1..=20);

            entities.push(EntityDescriptor::robot(name.clone(), end));
            entities.push(EntityDescriptor::package(format!("{name}_package"), start, end));
            trips.push(TripRequest { start, end, ..TripRequest::new(name, weight, search) });
        }

        Scenario {
            config: SimConfig { seed, ..SimConfig::default() },
            entities,
            trips,
            graph: None,
            routing: Some(grid_graph(half)),
        }
    }
}

/// Square street grid centred on the origin.
fn grid_graph(half: f64) -> RoutingGraph {
    let mut b = RoutingGraphBuilder::with_capacity(GRID_SIDE * GRID_SIDE, 4 * GRID_SIDE * GRID_SIDE);
    let mut ids = Vec::with_capacity(GRID_SIDE * GRID_SIDE);
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let x = col as f64 * GRID_SPACING - half;
            let z = row as f64 * GRID_SPACING - half;
            ids.push(b.add_node(Vec3::new(x, ALTITUDE, z)));
        }
    }
    for row in 0..GRID_SIDE {
        for col in 0..GRID_SIDE {
            let here = ids[row * GRID_SIDE + col];
            if col + 1 < GRID_SIDE {
                b.add_road(here, ids[row * GRID_SIDE + col + 1]);
            }
            if row + 1 < GRID_SIDE {
                b.add_road(here, ids[(row + 1) * GRID_SIDE + col]);
            }
        }
    }
    b.build()
}
