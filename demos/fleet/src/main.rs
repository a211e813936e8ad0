//! fleet — run a drone delivery scenario and write its telemetry as CSV.
//!
//! ```text
//! fleet [SCENARIO.json] [OUTPUT_DIR]
//! ```
//!
//! Without a scenario file a seeded grid-city scenario is generated.
//! Output goes to `output/fleet` unless a directory is given.  Log
//! verbosity follows `RUST_LOG` (default `info`).

mod scenario;

use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dd_output::{CsvWriter, OutputController};
use dd_sim::SimBuilder;

use scenario::Scenario;

const DEFAULT_SEED:       u64  = 42;
const DEFAULT_OUTPUT_DIR: &str = "output/fleet";

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    let mut args = env::args().skip(1);
    let scenario = match args.next() {
        Some(path) => Scenario::load(Path::new(&path))?,
        None => {
            info!(seed = DEFAULT_SEED, "no scenario given, generating one");
            Scenario::generate(DEFAULT_SEED)
        }
    };
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let config = scenario.config.clone();
    info!(
        entities = scenario.entities.len(),
        trips = scenario.trips.len(),
        ticks = config.total_ticks,
        tick_dt = config.tick_dt,
        graph = scenario.routing.as_ref().map(|g| g.node_count()),
        "scenario ready"
    );

    let writer = CsvWriter::new(&output_dir)?;
    let controller = OutputController::new(writer, &config);
    let mut builder = SimBuilder::new(config, controller)
        .entities(scenario.entities)
        .trips(scenario.trips);
    if let Some(graph) = scenario.routing {
        builder = builder.graph(graph);
    }
    let mut model = builder.build()?;

    let t0 = Instant::now();
    model.run();
    let elapsed = t0.elapsed();

    let pending = model.pending_deliveries().count();
    let final_tick = model.current_tick();
    let drones: Vec<_> = model
        .drones()
        .map(|d| (d.body.name.clone(), d.battery_percent(), d.state()))
        .collect();

    let mut controller = model.into_controller();
    controller.finish();
    if let Some(e) = controller.take_error() {
        warn!(error = %e, "output incomplete");
    }

    info!(
        %final_tick,
        delivered = controller.delivered(),
        pending,
        secs = elapsed.as_secs_f64(),
        output = %output_dir.display(),
        "run complete"
    );

    println!("{:<12} {:>9} {:<16}", "Drone", "Battery", "State");
    println!("{}", "-".repeat(39));
    for (name, battery, state) in drones {
        println!("{:<12} {:>8.1}% {:<16}", name, battery, format!("{state:?}"));
    }

    Ok(())
}
