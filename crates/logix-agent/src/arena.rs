//! Owning arenas for agents and packages, indexed by their typed ids.
//!
//! A plain `Vec` indexed by `id.index()` — one record type with named
//! fields, one owning arena per entity kind, no column storage.

use logix_core::{AgentId, PackageId};

use crate::{Agent, Package};

#[derive(Clone, Debug, Default)]
pub struct AgentArena {
    agents: Vec<Agent>,
}

impl AgentArena {
    pub fn new(agents: Vec<Agent>) -> Self {
        Self { agents }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    #[inline]
    pub fn get(&self, id: AgentId) -> &Agent {
        &self.agents[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: AgentId) -> &mut Agent {
        &mut self.agents[id.index()]
    }

    pub fn try_get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    pub fn try_get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.agents.len() as u32).map(AgentId)
    }

    /// Split a two-agent mutable borrow. Panics if `a == b`.
    pub fn get_pair_mut(&mut self, a: AgentId, b: AgentId) -> (&mut Agent, &mut Agent) {
        assert_ne!(a, b, "get_pair_mut requires distinct agent ids");
        let (lo, hi) = if a.index() < b.index() { (a, b) } else { (b, a) };
        let (left, right) = self.agents.split_at_mut(hi.index());
        let lo_ref = &mut left[lo.index()];
        let hi_ref = &mut right[0];
        if a.index() < b.index() {
            (lo_ref, hi_ref)
        } else {
            (hi_ref, lo_ref)
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct PackageArena {
    packages: Vec<Package>,
}

impl PackageArena {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    #[inline]
    pub fn get(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: PackageId) -> &mut Package {
        &mut self.packages[id.index()]
    }

    pub fn try_get(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Package> {
        self.packages.iter_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = PackageId> + '_ {
        (0..self.packages.len() as u32).map(PackageId)
    }
}
