//! Fluent builders for [`AgentArena`] and [`PackageArena`].
//!
//! # Usage
//!
//! ```rust
//! use logix_agent::{AgentArenaBuilder, PackageArenaBuilder};
//!
//! let agents = AgentArenaBuilder::new()
//!     .push("R1", (0, 0))
//!     .push("R2", (4, 4))
//!     .build()
//!     .unwrap();
//! assert_eq!(agents.len(), 2);
//!
//! let packages = PackageArenaBuilder::new()
//!     .push("P1", (0, 5), (5, 5))
//!     .build()
//!     .unwrap();
//! assert_eq!(packages.len(), 1);
//! ```

use std::collections::HashSet;

use logix_core::{AgentId, Cell, PackageId};

use crate::{Agent, AgentArena, AgentError, AgentResult, Package, PackageArena};

#[derive(Default)]
pub struct AgentArenaBuilder {
    agents: Vec<Agent>,
    names: HashSet<String>,
}

impl AgentArenaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new agent at `pos`, assigning it the next sequential `AgentId`.
    pub fn push(mut self, name: impl Into<String>, pos: Cell) -> Self {
        let id = AgentId(self.agents.len() as u32);
        let name = name.into();
        self.names.insert(name.clone());
        self.agents.push(Agent::new(id, name, pos));
        self
    }

    pub fn build(self) -> AgentResult<AgentArena> {
        if self.names.len() != self.agents.len() {
            let mut seen = HashSet::new();
            for a in &self.agents {
                if !seen.insert(a.name.clone()) {
                    return Err(AgentError::DuplicateAgentName(a.name.clone()));
                }
            }
        }
        Ok(AgentArena::new(self.agents))
    }
}

#[derive(Default)]
pub struct PackageArenaBuilder {
    packages: Vec<Package>,
    names: HashSet<String>,
}

impl PackageArenaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, name: impl Into<String>, pickup: Cell, dropoff: Cell) -> Self {
        let id = PackageId(self.packages.len() as u32);
        let name = name.into();
        self.names.insert(name.clone());
        self.packages.push(Package::new(id, name, pickup, dropoff));
        self
    }

    pub fn build(self) -> AgentResult<PackageArena> {
        if self.names.len() != self.packages.len() {
            let mut seen = HashSet::new();
            for p in &self.packages {
                if !seen.insert(p.name.clone()) {
                    return Err(AgentError::DuplicatePackageName(p.name.clone()));
                }
            }
        }
        Ok(PackageArena::new(self.packages))
    }
}
