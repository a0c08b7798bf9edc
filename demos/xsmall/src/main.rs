//! xsmall — smallest end-to-end demo for the logistics grid simulator.
//!
//! Loads a tiny embedded warehouse layout (10x10 grid, one interior wall,
//! three robots, three packages), runs it to completion or timeout, and
//! writes a domain-event log plus per-tick summaries under `output/xsmall`.

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Result};

use logix_agent::{AgentState, PackageStatus};
use logix_config::{build_world, load_world};
use logix_engine::{SimBuilder, SimOutcome, Tunables};
use logix_oracle::NoopOracle;
use logix_output::{CsvWriter, SimOutputObserver};

const WORLD_JSON: &str = r#"{
  "settings": { "rows": 10, "cols": 10, "sleep": 0.0, "max_wait": 6, "max_steps": 2000 },
  "walls":    [[2, 2, 7, 2]],
  "robots":   [
    { "name": "R1", "pos": [0, 0] },
    { "name": "R2", "pos": [0, 9] },
    { "name": "R3", "pos": [9, 0] }
  ],
  "packages": [
    { "name": "P1", "pickup": [0, 5], "dropoff": [9, 9] },
    { "name": "P2", "pickup": [9, 9], "dropoff": [0, 0] },
    { "name": "P3", "pickup": [5, 5], "dropoff": [0, 9] }
  ]
}"#;

fn main() -> Result<()> {
    println!("=== xsmall — logistics grid simulator ===");

    // 1. Load and validate the embedded world.
    let config = load_world(Cursor::new(WORLD_JSON)).map_err(|errs| {
        for e in &errs {
            eprintln!("config error: {e}");
        }
        anyhow!("{} config error(s), see above", errs.len())
    })?;

    let world = build_world(config).map_err(|errs| {
        for e in &errs {
            eprintln!("world error: {e}");
        }
        anyhow!("{} world error(s), see above", errs.len())
    })?;

    println!(
        "Grid: {}  |  robots: {}  |  packages: {}  |  walls: {}",
        world.dims,
        world.agents.len(),
        world.packages.len(),
        world.obstacles.len(),
    );

    // 2. Map the JSON settings onto the engine's tunables.
    let tunables = Tunables {
        max_wait_actions: world.settings.max_wait,
        max_steps: world.settings.max_steps,
        ..Tunables::default()
    };

    // 3. Build the sim.
    let mut sim = SimBuilder::new(world.dims, world.obstacles, world.agents, world.packages, NoopOracle, tunables)
        .build()
        .map_err(|e| anyhow!("failed to build sim: {e}"))?;

    // 4. Set up CSV output.
    std::fs::create_dir_all("output/xsmall")?;
    let writer = CsvWriter::new(Path::new("output/xsmall"))?;
    let mut obs = SimOutputObserver::new(writer);

    // 5. Run to completion or timeout.
    let t0 = Instant::now();
    let outcome = sim.run(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    match outcome {
        SimOutcome::Delivered { tick } => println!("All packages delivered, all robots home — tick {}", tick.0),
        SimOutcome::Timeout { tick } => println!("Timed out at tick {} with undelivered packages", tick.0),
    }
    println!("Simulated in {:.3} s", elapsed.as_secs_f64());
    println!();

    println!("{:<8} {:<10} {:<10}", "Package", "Status", "Assigned");
    println!("{}", "-".repeat(32));
    for package in sim.packages().iter() {
        let status = match package.status {
            PackageStatus::Waiting => "waiting",
            PackageStatus::Picked => "picked",
            PackageStatus::Delivered => "delivered",
        };
        let assigned = package
            .assigned_to
            .map(|id| sim.agents().get(id).name.clone())
            .unwrap_or_else(|| "-".to_string());
        println!("{:<8} {:<10} {:<10}", package.name, status, assigned);
    }

    println!();
    println!("{:<8} {:<10} {:<12}", "Robot", "State", "Position");
    println!("{}", "-".repeat(32));
    for agent in sim.agents().iter() {
        let state = match agent.state {
            AgentState::Idle => "idle",
            AgentState::ToPickup => "to_pickup",
            AgentState::ToDropoff => "to_dropoff",
            AgentState::Evacuating => "evacuating",
            AgentState::Home => "home",
        };
        println!("{:<8} {:<10} {:<12?}", agent.name, state, agent.pos);
    }

    std::process::exit(outcome.exit_code());
}
