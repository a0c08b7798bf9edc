//! JSON world configuration loader.
//!
//! # JSON format
//!
//! ```json
//! {
//!   "settings": { "rows": 10, "cols": 10, "sleep": 0.1, "max_wait": 6, "max_steps": 2000 },
//!   "walls":    [[2, 2, 2, 7]],
//!   "robots":   [{ "name": "R1", "pos": [0, 0] }],
//!   "packages": [{ "name": "P1", "pickup": [0, 5], "dropoff": [9, 9] }]
//! }
//! ```
//!
//! `settings`, robot `id`/`name`, and package `name` are all optional — a
//! missing `settings` block uses the engine's defaults. A robot's default
//! name is `R<id>`, where a missing `id` defaults to the robot's one-based
//! position in the `robots` list; unnamed packages are numbered `P0`, `P1`,
//! ... in file order.
//!
//! Every coordinate in the file, not just the first bad one, is checked
//! before [`build_world`] gives up — malformed input is reported all at
//! once rather than one error at a time.

use std::collections::HashSet;
use std::io::Read;

use serde::Deserialize;

use logix_agent::{AgentArena, AgentArenaBuilder, PackageArena, PackageArenaBuilder};
use logix_core::{Cell, GridDims, GridOps};

use crate::ConfigError;

// ── Raw JSON shape ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub walls: Vec<Vec<i32>>,
    #[serde(default)]
    pub robots: Vec<RobotDef>,
    #[serde(default)]
    pub packages: Vec<PackageDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_rows")]
    pub rows: i32,
    #[serde(default = "Settings::default_cols")]
    pub cols: i32,
    #[serde(default = "Settings::default_sleep")]
    pub sleep: f64,
    #[serde(default = "Settings::default_max_wait")]
    pub max_wait: u32,
    #[serde(default = "Settings::default_max_steps")]
    pub max_steps: u64,
}

impl Settings {
    fn default_rows() -> i32 {
        10
    }
    fn default_cols() -> i32 {
        10
    }
    fn default_sleep() -> f64 {
        0.1
    }
    fn default_max_wait() -> u32 {
        6
    }
    fn default_max_steps() -> u64 {
        2000
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: Self::default_rows(),
            cols: Self::default_cols(),
            sleep: Self::default_sleep(),
            max_wait: Self::default_max_wait(),
            max_steps: Self::default_max_steps(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RobotDef {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub pos: [i32; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct PackageDef {
    pub name: Option<String>,
    pub pickup: [i32; 2],
    pub dropoff: [i32; 2],
}

/// The fully resolved world: grid dimensions, obstacle set, and the initial
/// agent/package arenas.
pub struct World {
    pub dims: GridDims,
    pub obstacles: HashSet<Cell>,
    pub agents: AgentArena,
    pub packages: PackageArena,
    pub settings: Settings,
}

/// Parse a JSON world configuration from `reader`.
///
/// A malformed document is a single-element error list; callers that want to
/// distinguish "bad JSON" from "bad world" should inspect the error before
/// calling [`build_world`].
pub fn load_world<R: Read>(mut reader: R) -> Result<WorldConfig, Vec<ConfigError>> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .map_err(|e| vec![ConfigError::Io(e)])?;
    serde_json::from_str(&buf).map_err(|e| vec![ConfigError::Parse(e.to_string())])
}

/// Validate and resolve a parsed [`WorldConfig`] into a runnable [`World`].
///
/// Every problem in the file is collected and returned together; nothing is
/// silently skipped or defaulted around.
pub fn build_world(config: WorldConfig) -> Result<World, Vec<ConfigError>> {
    let mut errors = Vec::new();
    let dims = GridDims::new(config.settings.rows, config.settings.cols);

    let mut obstacles = HashSet::new();
    for wall in &config.walls {
        if wall.len() != 4 {
            errors.push(ConfigError::MalformedWall(wall.len()));
            continue;
        }
        for cell in GridOps::expand_wall_rect(wall[0], wall[1], wall[2], wall[3]) {
            if !GridOps::in_bounds(dims, cell.0, cell.1) {
                errors.push(ConfigError::OutOfBounds {
                    row: cell.0,
                    col: cell.1,
                    rows: dims.rows,
                    cols: dims.cols,
                });
                continue;
            }
            obstacles.insert(cell);
        }
    }

    let mut robot_names = HashSet::new();
    let mut robots = AgentArenaBuilder::new();
    for (i, r) in config.robots.iter().enumerate() {
        let display_id = r.id.unwrap_or(i as u32 + 1);
        let name = r.name.clone().unwrap_or_else(|| format!("R{display_id}"));
        let pos: Cell = (r.pos[0], r.pos[1]);
        if !GridOps::in_bounds(dims, pos.0, pos.1) {
            errors.push(ConfigError::OutOfBounds {
                row: pos.0,
                col: pos.1,
                rows: dims.rows,
                cols: dims.cols,
            });
            continue;
        }
        if obstacles.contains(&pos) {
            errors.push(ConfigError::SpawnOnObstacle {
                what: "robot",
                row: pos.0,
                col: pos.1,
            });
            continue;
        }
        if !robot_names.insert(name.clone()) {
            errors.push(ConfigError::DuplicateRobotName(name));
            continue;
        }
        robots = robots.push(name, pos);
    }

    let mut package_names = HashSet::new();
    let mut packages = PackageArenaBuilder::new();
    for (i, p) in config.packages.iter().enumerate() {
        let name = p.name.clone().unwrap_or_else(|| format!("P{i}"));
        let pickup: Cell = (p.pickup[0], p.pickup[1]);
        let dropoff: Cell = (p.dropoff[0], p.dropoff[1]);
        let mut bad = false;
        for (what, pos) in [("package pickup", pickup), ("package dropoff", dropoff)] {
            if !GridOps::in_bounds(dims, pos.0, pos.1) {
                errors.push(ConfigError::OutOfBounds {
                    row: pos.0,
                    col: pos.1,
                    rows: dims.rows,
                    cols: dims.cols,
                });
                bad = true;
            } else if obstacles.contains(&pos) {
                errors.push(ConfigError::SpawnOnObstacle { what, row: pos.0, col: pos.1 });
                bad = true;
            }
        }
        if bad {
            continue;
        }
        if !package_names.insert(name.clone()) {
            errors.push(ConfigError::DuplicatePackageName(name));
            continue;
        }
        packages = packages.push(name, pickup, dropoff);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    let agents = robots
        .build()
        .map_err(|e| vec![ConfigError::DuplicateRobotName(e.to_string())])?;
    let packages = packages
        .build()
        .map_err(|e| vec![ConfigError::DuplicatePackageName(e.to_string())])?;

    Ok(World {
        dims,
        obstacles,
        agents,
        packages,
        settings: config.settings,
    })
}
