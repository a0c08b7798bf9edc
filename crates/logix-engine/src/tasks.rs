//! Package assignment, reassignment, and agent/package state-consistency
//! repair. Mutates agent and package state only — never plans a path itself;
//! the planning phase picks up any agent left without one this same tick.

use logix_agent::{AgentArena, AgentState, PackageArena, PackageStatus};
use logix_core::{AgentId, GridOps, PackageId};
use logix_grid::Grid;

use crate::Tunables;

/// Distance bands for `traffic_density`'s contribution from one other agent.
const DENSITY_NEAR: i32 = 0;
const DENSITY_CLOSE: i32 = 2;
const DENSITY_FAR: i32 = 4;

pub struct TaskManager {
    tunables: Tunables,
}

impl TaskManager {
    pub fn new(tunables: Tunables) -> Self {
        Self { tunables }
    }

    fn traffic_density(&self, cell: logix_core::Cell, self_id: AgentId, agents: &AgentArena) -> f64 {
        let mut density = 0.0;
        for other in agents.iter() {
            if other.id == self_id {
                continue;
            }
            let dist = GridOps::manhattan(cell, other.pos);
            density += if dist == DENSITY_NEAR {
                10.0
            } else if dist <= DENSITY_CLOSE {
                5.0 / dist as f64
            } else if dist <= DENSITY_FAR {
                2.0 / dist as f64
            } else {
                0.0
            };
        }
        density
    }

    /// Score used by [`request_package`] and [`force_idle_robots_to_work`]
    /// to rank candidate packages for an agent — lower is better.
    fn package_cost(&self, agent_id: AgentId, agent_pos: logix_core::Cell, pkg_id: PackageId, packages: &PackageArena, agents: &AgentArena, grid: &Grid) -> f64 {
        let package = packages.get(pkg_id);
        let pickup_dist = GridOps::manhattan(agent_pos, package.pickup) as f64;
        let pickup_dropoff_dist = GridOps::manhattan(package.pickup, package.dropoff) as f64;
        let density = self.traffic_density(package.pickup, agent_id, agents);
        let narrow_penalty = if grid.is_narrow_passage(package.pickup) { 2.0 } else { 0.0 };
        let competing = agents
            .iter()
            .filter(|other| other.id != agent_id && other.package.is_none())
            .filter(|other| GridOps::manhattan(other.pos, package.pickup) < pickup_dist as i32)
            .count();

        1.0 * pickup_dist + 0.2 * pickup_dropoff_dist + 1.5 * density + narrow_penalty + 3.0 * competing as f64
    }

    /// Pick the best WAITING, unassigned package for `agent`, if any.
    pub fn request_package(&self, agent_id: AgentId, agents: &AgentArena, packages: &PackageArena, grid: &Grid) -> Option<PackageId> {
        let agent_pos = agents.get(agent_id).pos;
        packages
            .iter()
            .filter(|p| p.status == PackageStatus::Waiting && p.assigned_to.is_none())
            .map(|p| p.id)
            .min_by(|&a, &b| {
                self.package_cost(agent_id, agent_pos, a, packages, agents, grid)
                    .partial_cmp(&self.package_cost(agent_id, agent_pos, b, packages, agents, grid))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// Clear an assignment on a WAITING package whose assigned agent is no
    /// longer actively pursuing it.
    pub fn cleanup_orphaned_assignments(&self, agents: &mut AgentArena, packages: &mut PackageArena) {
        for package in packages.iter_mut() {
            if package.status != PackageStatus::Waiting {
                continue;
            }
            let Some(owner) = package.assigned_to else { continue };
            let actively_pursuing = agents
                .try_get(owner)
                .is_some_and(|a| a.state == AgentState::ToPickup && a.package == Some(package.id));
            if !actively_pursuing {
                package.assigned_to = None;
            }
        }
    }

    /// Transfer a package from a badly stuck owner to a closer, free agent.
    pub fn reassign_stuck_packages(&self, agents: &mut AgentArena, packages: &mut PackageArena) {
        let stuck_owners: Vec<(AgentId, PackageId, logix_core::Cell)> = agents
            .iter()
            .filter(|a| a.wait_count > self.tunables.reassign_threshold)
            .filter_map(|a| a.package.map(|p| (a.id, p, a.pos)))
            .filter(|&(_, pkg_id, _)| packages.get(pkg_id).status == PackageStatus::Waiting)
            .collect();

        for (owner, pkg_id, owner_pos) in stuck_owners {
            let pickup = packages.get(pkg_id).pickup;
            let owner_dist = GridOps::manhattan(owner_pos, pickup);

            let replacement = agents
                .iter()
                .filter(|a| a.id != owner)
                .filter(|a| matches!(a.state, AgentState::Idle | AgentState::Home))
                .filter(|a| a.wait_count <= self.tunables.yield_threshold)
                .filter(|a| GridOps::manhattan(a.pos, pickup) < owner_dist)
                .min_by_key(|a| GridOps::manhattan(a.pos, pickup))
                .map(|a| a.id);

            if let Some(new_owner) = replacement {
                packages.get_mut(pkg_id).assigned_to = Some(new_owner);
                let prev = agents.get_mut(owner);
                prev.package = None;
                prev.force_reset_to_idle();
                let next = agents.get_mut(new_owner);
                next.package = Some(pkg_id);
                next.state = AgentState::ToPickup;
                next.path.clear();
            }
        }
    }

    /// Greedily hand any unassigned WAITING package to an idle agent.
    pub fn force_idle_robots_to_work(&self, agents: &mut AgentArena, packages: &mut PackageArena, grid: &Grid) {
        let idle_ids: Vec<AgentId> = agents
            .iter()
            .filter(|a| a.state == AgentState::Idle && a.package.is_none())
            .map(|a| a.id)
            .collect();

        for id in idle_ids {
            let Some(pkg_id) = self.request_package(id, agents, packages, grid) else {
                continue;
            };
            packages.get_mut(pkg_id).assigned_to = Some(id);
            let agent = agents.get_mut(id);
            agent.package = Some(pkg_id);
            agent.state = AgentState::ToPickup;
            agent.path.clear();
        }
    }

    /// Repair agent/package state mismatches that should never persist past
    /// a single planning pass.
    pub fn fix_robot_states(&self, agents: &mut AgentArena, packages: &PackageArena) {
        for agent in agents.iter_mut() {
            let Some(pkg_id) = agent.package else { continue };
            let status = packages.get(pkg_id).status;
            if status == PackageStatus::Picked && agent.state == AgentState::Idle {
                agent.state = AgentState::ToDropoff;
                agent.path.clear();
            } else if status == PackageStatus::Waiting && agent.state == AgentState::Idle {
                agent.state = AgentState::ToPickup;
                agent.path.clear();
            }
        }
    }

    /// Full reset of a hopelessly stuck agent, releasing any WAITING
    /// package it still owned.
    pub fn force_reset_stuck_state(&self, agent_id: AgentId, agents: &mut AgentArena, packages: &mut PackageArena) {
        let agent = agents.get_mut(agent_id);
        if let Some(pkg_id) = agent.package {
            if packages.get(pkg_id).status == PackageStatus::Waiting {
                packages.get_mut(pkg_id).assigned_to = None;
            }
        }
        agent.package = None;
        agent.force_reset_to_idle();
    }
}
