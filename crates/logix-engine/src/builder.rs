//! Fluent builder for constructing a [`Sim`].

use std::collections::HashSet;

use logix_agent::{AgentArena, PackageArena};
use logix_core::{Cell, GridDims};
use logix_grid::{CorridorMap, Grid};
use logix_oracle::DeadlockRiskOracle;

use crate::pathfind::Pathfinder;
use crate::resolve::DeadlockResolver;
use crate::tasks::TaskManager;
use crate::tunables::Tunables;
use crate::{EngineError, EngineResult, Sim};

/// Builder for [`Sim<Ora>`].
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(dims, obstacles, agents, packages, NoopOracle, Tunables::default())
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<Ora: DeadlockRiskOracle> {
    dims: GridDims,
    obstacles: HashSet<Cell>,
    agents: AgentArena,
    packages: PackageArena,
    oracle: Ora,
    tunables: Tunables,
}

impl<Ora: DeadlockRiskOracle> SimBuilder<Ora> {
    /// Create a builder with all required inputs. `agents`' `home` fields
    /// are taken as each agent's current `pos` at construction time.
    pub fn new(
        dims: GridDims,
        obstacles: HashSet<Cell>,
        agents: AgentArena,
        packages: PackageArena,
        oracle: Ora,
        tunables: Tunables,
    ) -> Self {
        Self {
            dims,
            obstacles,
            agents,
            packages,
            oracle,
            tunables,
        }
    }

    /// Build the static grid and corridor map, wire up the pathfinder,
    /// deadlock resolver, and task manager, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> EngineResult<Sim<Ora>> {
        if self.dims.rows <= 0 || self.dims.cols <= 0 {
            return Err(EngineError::EmptyGrid {
                rows: self.dims.rows,
                cols: self.dims.cols,
            });
        }

        let grid = Grid::new(self.dims, self.obstacles);
        let pickups: Vec<Cell> = self.packages.iter().map(|p| p.pickup).collect();
        let dropoffs: Vec<Cell> = self.packages.iter().map(|p| p.dropoff).collect();
        let corridors = CorridorMap::build(&grid, &pickups, &dropoffs);

        let pathfinder = Pathfinder::new(grid, corridors, self.oracle, self.tunables);
        let resolver = DeadlockResolver::new(self.tunables);
        let tasks = TaskManager::new(self.tunables);

        Ok(Sim {
            tick: logix_core::Tick::ZERO,
            agents: self.agents,
            packages: self.packages,
            pathfinder,
            resolver,
            tasks,
            tunables: self.tunables,
        })
    }
}
