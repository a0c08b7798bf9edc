//! Deadlock detection and the per-agent decisive-action ladder: yield,
//! repath, retreat, emergency, pre-empt — plus critical-path evacuation for
//! idle agents in a carrier's way.

use std::collections::HashMap;

use logix_agent::{Agent, AgentArena, AgentState, DecisionMode, PackageArena};
use logix_core::{AgentId, Cell, GridOps, Tick};
use logix_grid::Grid;

use crate::events::DomainEvent;
use crate::Tunables;

/// Ticks an agent may remain EVACUATING before a forced reset.
const EVAC_TIMEOUT: u64 = 15;
/// Ticks an agent may remain in the YIELD decision mode before reverting to NORMAL.
const YIELD_TIMEOUT: u64 = 10;
/// Window of recent positions examined for oscillation.
const OSCILLATION_WINDOW: usize = 5;
/// Max depth when tracing a wait-chain for cycle detection.
const MAX_CHAIN_DEPTH: usize = 10;
/// Importance gap required for a waiting agent to pre-empt its blocker.
const PREEMPT_MARGIN: i64 = 200;
/// Radius (Manhattan) within which a blocker is considered "near" a live dropoff.
const NEAR_DROPOFF_RADIUS: i32 = 2;
/// An evacuation spot further than this from the blocker isn't worth taking.
const MAX_EVAC_DISTANCE: i32 = 3;
/// Depth bound for the critical-path evacuation BFS fallback.
const EVAC_BFS_DEPTH: i32 = 4;
/// How many of the blocker's upcoming path cells count when scoring a yield spot.
const BLOCKER_LOOKAHEAD: usize = 5;

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
/// The four diagonal offsets, appended to `ORTHOGONAL` when a yield spot is
/// searched for — a yield position is a sidestep, not a planned path move,
/// so it is allowed to land off the 4-connected grid.
const DIAGONAL: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub struct DeadlockResolver {
    tunables: Tunables,
}

impl DeadlockResolver {
    pub fn new(tunables: Tunables) -> Self {
        Self { tunables }
    }

    fn build_pos_index(agents: &AgentArena) -> HashMap<Cell, AgentId> {
        agents.iter().map(|a| (a.pos, a.id)).collect()
    }

    /// Deterministic, per-agent varied neighbor ordering used wherever the
    /// original system shuffled candidate directions randomly — the engine
    /// has no RNG, so rotate the fixed direction list by the agent's id
    /// instead.
    fn candidate_directions(agent_id: AgentId) -> [(i32, i32); 4] {
        let shift = agent_id.index() % 4;
        let mut dirs = ORTHOGONAL;
        dirs.rotate_left(shift);
        dirs
    }

    /// Same rotation idiom as [`Self::candidate_directions`], but over all
    /// eight Moore neighbors — used where a sidestep spot is chosen rather
    /// than a planned path move.
    fn candidate_directions_8(agent_id: AgentId) -> [(i32, i32); 8] {
        let shift = agent_id.index() % 8;
        let mut dirs = [(0, 0); 8];
        dirs[..4].copy_from_slice(&ORTHOGONAL);
        dirs[4..].copy_from_slice(&DIAGONAL);
        dirs.rotate_left(shift);
        dirs
    }

    /// Scalar used to rank agents during deadlock resolution, yield
    /// arbitration, and pre-emption.
    pub fn importance(&self, agent: &Agent) -> i64 {
        let state_base = match agent.state {
            AgentState::ToDropoff => 1000,
            AgentState::ToPickup => 500,
            AgentState::Home => 100,
            AgentState::Evacuating => 50,
            AgentState::Idle => 0,
        };
        let path_bonus = if agent.state == AgentState::ToDropoff {
            (500 - agent.path.len() as i64).max(0).min(500)
        } else {
            0
        };
        state_base + path_bonus + agent.momentum as i64 * 20 + agent.wait_count as i64 * 10
    }

    // ── Phase 4: timeouts ───────────────────────────────────────────────────

    /// Flags agents whose EVACUATING/oscillation timeout fired this tick.
    /// Returned rather than reset in place — a full reset must also release
    /// any WAITING package the agent still owns, which needs the package
    /// arena; callers route these ids through
    /// [`crate::tasks::TaskManager::force_reset_stuck_state`].
    pub fn apply_timeouts(&self, agents: &mut AgentArena, tick: Tick) -> Vec<AgentId> {
        let mut needs_hard_reset = Vec::new();
        for agent in agents.iter_mut() {
            if agent.state == AgentState::Evacuating {
                if tick.since(agent.evac_start_tick.unwrap_or(tick)) > EVAC_TIMEOUT {
                    needs_hard_reset.push(agent.id);
                    continue;
                }
            }
            if agent.decision_mode == DecisionMode::Yield {
                if tick.since(agent.yield_start_tick.unwrap_or(tick)) > YIELD_TIMEOUT {
                    agent.decision_mode = DecisionMode::Normal;
                    agent.yield_to = None;
                    agent.yield_start_tick = None;
                }
            }
            if agent.detect_oscillation(OSCILLATION_WINDOW) {
                needs_hard_reset.push(agent.id);
            }
        }
        needs_hard_reset
    }

    // ── Phase 3: deadlock group detection & resolution ─────────────────────

    fn trace_wait_chain(start: AgentId, agents: &AgentArena, pos_index: &HashMap<Cell, AgentId>) -> Option<Vec<AgentId>> {
        let mut chain = vec![start];
        let mut current = start;
        for _ in 0..MAX_CHAIN_DEPTH {
            let next_cell = agents.get(current).path.first().copied()?;
            let occupant = *pos_index.get(&next_cell)?;
            if let Some(idx) = chain.iter().position(|&id| id == occupant) {
                return Some(chain[idx..].to_vec());
            }
            chain.push(occupant);
            current = occupant;
        }
        None
    }

    pub fn detect_and_resolve(&self, agents: &mut AgentArena, grid: &Grid, tick: Tick, events: &mut Vec<DomainEvent>) {
        let pos_index = Self::build_pos_index(agents);
        let mut handled: Vec<AgentId> = Vec::new();

        let candidates: Vec<AgentId> = agents
            .iter()
            .filter(|a| a.wait_count > self.tunables.decision_wait_threshold)
            .map(|a| a.id)
            .collect();

        for id in candidates {
            if handled.contains(&id) {
                continue;
            }
            if let Some(chain) = Self::trace_wait_chain(id, agents, &pos_index) {
                if chain.len() >= 2 {
                    self.resolve_group(&chain, agents, grid, tick, events);
                    handled.extend(chain);
                }
            }
        }
    }

    fn resolve_group(&self, group: &[AgentId], agents: &mut AgentArena, grid: &Grid, tick: Tick, events: &mut Vec<DomainEvent>) {
        let loser = *group
            .iter()
            .min_by_key(|&&id| self.importance(agents.get(id)))
            .expect("group is non-empty");

        let pos_index = Self::build_pos_index(agents);
        let agent = agents.get(loser);
        let candidate = Self::first_free_neighbor(grid, agent, &pos_index, agent.id)
            .or_else(|| {
                // Retry ignoring `failed_paths` before giving up entirely.
                Self::first_free_neighbor_ignoring_failed(grid, agent, &pos_index)
            });

        if let Some(spot) = candidate {
            let agent = agents.get_mut(loser);
            agent.path = vec![spot];
            agent.failed_paths.clear();
            agent.decision_mode = DecisionMode::Emergency;
            agent.wait_count = 0;
            events.push(DomainEvent::DeadlockResolved {
                agent: loser,
                group_size: group.len(),
                tick,
            });
        }
    }

    fn first_free_neighbor(grid: &Grid, agent: &Agent, pos_index: &HashMap<Cell, AgentId>, self_id: AgentId) -> Option<Cell> {
        for dir in Self::candidate_directions(self_id) {
            let next = (agent.pos.0 + dir.0, agent.pos.1 + dir.1);
            if !grid.in_bounds(next) || grid.is_obstacle(next) {
                continue;
            }
            if agent.failed_paths.contains(&next) {
                continue;
            }
            if pos_index.get(&next).is_some_and(|&occ| occ != self_id) {
                continue;
            }
            return Some(next);
        }
        None
    }

    fn first_free_neighbor_ignoring_failed(grid: &Grid, agent: &Agent, pos_index: &HashMap<Cell, AgentId>) -> Option<Cell> {
        for dir in Self::candidate_directions(agent.id) {
            let next = (agent.pos.0 + dir.0, agent.pos.1 + dir.1);
            if !grid.in_bounds(next) || grid.is_obstacle(next) {
                continue;
            }
            if pos_index.get(&next).is_some_and(|&occ| occ != agent.id) {
                continue;
            }
            return Some(next);
        }
        None
    }

    // ── Tie-break between two agents contending for the same cell ─────────

    /// Returns the id of the agent that does **not** yield: the higher
    /// importance of the two, ties broken by the longer remaining path,
    /// ties broken again by the lower id.
    fn decide_who_yields(&self, a: &Agent, b: &Agent) -> AgentId {
        let ia = self.importance(a);
        let ib = self.importance(b);
        if ia != ib {
            return if ia > ib { a.id } else { b.id };
        }
        if a.path.len() != b.path.len() {
            return if a.path.len() > b.path.len() { a.id } else { b.id };
        }
        a.id.min(b.id)
    }

    fn find_yield_position(
        &self,
        grid: &Grid,
        yielder_pos: Cell,
        blocker: &Agent,
        pos_index: &HashMap<Cell, AgentId>,
        self_id: AgentId,
    ) -> Option<Cell> {
        let mut banned: Vec<Cell> = blocker.path.iter().take(BLOCKER_LOOKAHEAD).copied().collect();
        banned.push(blocker.pos);
        let mut best: Option<(Cell, f64)> = None;
        for dir in Self::candidate_directions_8(self_id) {
            let next = (yielder_pos.0 + dir.0, yielder_pos.1 + dir.1);
            if !grid.in_bounds(next) || grid.is_obstacle(next) {
                continue;
            }
            if banned.contains(&next) {
                continue;
            }
            if pos_index.get(&next).is_some_and(|&occ| occ != self_id) {
                continue;
            }
            let min_dist = banned.iter().map(|&c| GridOps::manhattan(next, c)).min().unwrap_or(0);
            let score = grid.corridor_score(next) as f64 + 2.0 * min_dist as f64;
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((next, score));
            }
        }
        best.map(|(cell, _)| cell)
    }

    fn find_retreat_path(&self, grid: &Grid, agent: &Agent, pos_index: &HashMap<Cell, AgentId>) -> Option<Vec<Cell>> {
        if agent.last_dir == (0, 0) {
            return None;
        }
        let back = (-agent.last_dir.0, -agent.last_dir.1);
        let mut path = Vec::new();
        let mut cur = agent.pos;
        for _ in 0..3 {
            let next = (cur.0 + back.0, cur.1 + back.1);
            if !grid.in_bounds(next) || grid.is_obstacle(next) {
                break;
            }
            if pos_index.get(&next).is_some_and(|&occ| occ != agent.id) {
                break;
            }
            path.push(next);
            cur = next;
        }
        if path.is_empty() {
            None
        } else {
            Some(path)
        }
    }

    // ── Phase 6: per-agent decisive action ──────────────────────────────────

    pub fn decisive_action(
        &self,
        agents: &mut AgentArena,
        grid: &Grid,
        tick: Tick,
        events: &mut Vec<DomainEvent>,
    ) {
        let mut ids: Vec<AgentId> = agents.iter().map(|a| a.id).collect();
        ids.sort();

        for id in ids {
            let (wait_count, state, next_cell) = {
                let a = agents.get(id);
                (a.wait_count, a.state, a.path.first().copied())
            };
            if wait_count < self.tunables.yield_threshold {
                continue;
            }

            let pos_index = Self::build_pos_index(agents);
            let blocker_id = next_cell.and_then(|cell| pos_index.get(&cell).copied()).filter(|&o| o != id);

            if wait_count < self.tunables.decision_wait_threshold {
                self.yield_or_repath(agents, grid, id, blocker_id, &pos_index, tick, events);
            } else if wait_count < self.tunables.force_move_threshold {
                let agent = agents.get_mut(id);
                if let Some(cell) = agent.path.first().copied() {
                    agent.failed_paths.push(cell);
                }
                agent.path.clear();
            } else if wait_count < self.tunables.deadlock_threshold {
                self.retreat_or_emergency(agents, grid, id, &pos_index, tick, events);
            } else {
                self.deadlock_rung(agents, grid, id, state, blocker_id, &pos_index, tick, events);
            }
        }
    }

    fn yield_or_repath(
        &self,
        agents: &mut AgentArena,
        grid: &Grid,
        id: AgentId,
        blocker_id: Option<AgentId>,
        pos_index: &HashMap<Cell, AgentId>,
        tick: Tick,
        events: &mut Vec<DomainEvent>,
    ) {
        let Some(blocker_id) = blocker_id else { return };
        let winner = self.decide_who_yields(agents.get(id), agents.get(blocker_id));
        if winner != blocker_id {
            // Self must yield.
            let yield_pos = {
                let (pos, blocker) = (agents.get(id).pos, agents.get(blocker_id));
                self.find_yield_position(grid, pos, blocker, pos_index, id)
            };
            if let Some(spot) = yield_pos {
                let agent = agents.get_mut(id);
                agent.path = vec![spot];
                agent.decision_mode = DecisionMode::Yield;
                agent.yield_to = Some(blocker_id);
                agent.yield_start_tick = Some(tick);
                events.push(DomainEvent::Yield {
                    agent: id,
                    yield_to: blocker_id,
                    to: spot,
                    tick,
                });
            }
        } else {
            let agent = agents.get_mut(id);
            agent.failed_paths.clear();
            agent.path.clear();
        }
    }

    fn retreat_or_emergency(
        &self,
        agents: &mut AgentArena,
        grid: &Grid,
        id: AgentId,
        pos_index: &HashMap<Cell, AgentId>,
        tick: Tick,
        events: &mut Vec<DomainEvent>,
    ) {
        let retreat = self.find_retreat_path(grid, agents.get(id), pos_index);
        if let Some(path) = retreat {
            let to = *path.last().expect("non-empty retreat path");
            let agent = agents.get_mut(id);
            agent.path = path;
            agent.decision_mode = DecisionMode::Retreat;
            events.push(DomainEvent::Retreat { agent: id, to, tick });
            return;
        }
        if let Some(spot) = Self::first_free_neighbor(grid, agents.get(id), pos_index, id) {
            let agent = agents.get_mut(id);
            agent.path = vec![spot];
            agent.decision_mode = DecisionMode::Emergency;
            events.push(DomainEvent::Emergency { agent: id, to: spot, tick });
        }
    }

    fn deadlock_rung(
        &self,
        agents: &mut AgentArena,
        grid: &Grid,
        id: AgentId,
        state: AgentState,
        blocker_id: Option<AgentId>,
        pos_index: &HashMap<Cell, AgentId>,
        tick: Tick,
        events: &mut Vec<DomainEvent>,
    ) {
        if state == AgentState::Idle || state == AgentState::Home {
            if let Some(spot) = Self::first_free_neighbor(grid, agents.get(id), pos_index, id) {
                let agent = agents.get_mut(id);
                agent.path = vec![spot];
                agent.decision_mode = DecisionMode::Emergency;
                events.push(DomainEvent::Emergency { agent: id, to: spot, tick });
            }
            return;
        }

        let Some(occupant) = blocker_id else { return };
        let gap = self.importance(agents.get(id)) - self.importance(agents.get(occupant));
        if gap >= PREEMPT_MARGIN {
            let yield_pos = {
                let (occ_pos, occ) = (agents.get(occupant).pos, agents.get(id));
                self.find_yield_position(grid, occ_pos, occ, pos_index, occupant)
            };
            if let Some(spot) = yield_pos {
                let occ_agent = agents.get_mut(occupant);
                occ_agent.state = AgentState::Evacuating;
                occ_agent.evac_target = Some(spot);
                occ_agent.evac_start_tick = Some(tick);
                occ_agent.path = vec![spot];
                let agent = agents.get_mut(id);
                agent.path.clear();
                return;
            }
        }
        if let Some(spot) = Self::first_free_neighbor(grid, agents.get(id), pos_index, id) {
            let agent = agents.get_mut(id);
            agent.path = vec![spot];
            agent.decision_mode = DecisionMode::Emergency;
            events.push(DomainEvent::Emergency { agent: id, to: spot, tick });
        }
    }

    // ── Phase 5: critical-path evacuation ───────────────────────────────────

    fn critical_cells(agents: &AgentArena) -> std::collections::HashSet<Cell> {
        agents
            .iter()
            .filter(|a| a.state == AgentState::ToDropoff)
            .flat_map(|a| a.path.iter().copied())
            .collect()
    }

    pub fn critical_path_evac(
        &self,
        agents: &mut AgentArena,
        packages: &PackageArena,
        grid: &Grid,
        tick: Tick,
    ) {
        let critical = Self::critical_cells(agents);
        let pos_index = Self::build_pos_index(agents);

        let carrier_dropoffs: Vec<Cell> = agents
            .iter()
            .filter(|a| a.state == AgentState::ToDropoff)
            .filter_map(|a| a.package.map(|p| packages.get(p).dropoff))
            .collect();

        let blockers: Vec<AgentId> = agents
            .iter()
            .filter(|a| matches!(a.state, AgentState::Idle | AgentState::Home))
            .filter(|a| critical.contains(&a.pos))
            .filter(|a| {
                carrier_dropoffs
                    .iter()
                    .any(|&dropoff| GridOps::manhattan(a.pos, dropoff) <= NEAR_DROPOFF_RADIUS)
            })
            .map(|a| a.id)
            .collect();

        for id in blockers {
            let pos = agents.get(id).pos;
            if let Some(spot) = Self::find_evacuation_spot(grid, pos, &critical, &pos_index) {
                let agent = agents.get_mut(id);
                agent.state = AgentState::Evacuating;
                agent.evac_target = Some(spot);
                agent.evac_start_tick = Some(tick);
                agent.path = vec![spot];
            }
        }
    }

    fn find_evacuation_spot(
        grid: &Grid,
        from: Cell,
        critical: &std::collections::HashSet<Cell>,
        pos_index: &HashMap<Cell, AgentId>,
    ) -> Option<Cell> {
        let admissible = |cell: Cell, self_pos: Cell| -> bool {
            grid.in_bounds(cell)
                && !grid.is_obstacle(cell)
                && !critical.contains(&cell)
                && pos_index.get(&cell).is_none_or(|&occ| pos_index.get(&self_pos) == Some(&occ))
        };

        // Phase a: an adjacent non-critical cell with a decent corridor score.
        let mut best: Option<(Cell, i32)> = None;
        for (dr, dc) in ORTHOGONAL {
            let next = (from.0 + dr, from.1 + dc);
            if admissible(next, from) && grid.corridor_score(next) >= 4 {
                let score = grid.corridor_score(next);
                if best.is_none_or(|(_, b)| score > b) {
                    best = Some((next, score));
                }
            }
        }
        if let Some((cell, _)) = best {
            return Some(cell);
        }

        // Phase b: bounded BFS, scored by openness, depth penalty, and corner bonus.
        let mut visited = std::collections::HashSet::from([from]);
        let mut frontier = vec![(from, 0)];
        let mut best: Option<(Cell, f64)> = None;
        while let Some((cell, depth)) = frontier.pop() {
            if depth >= EVAC_BFS_DEPTH {
                continue;
            }
            for (dr, dc) in ORTHOGONAL {
                let next = (cell.0 + dr, cell.1 + dc);
                if !visited.insert(next) {
                    continue;
                }
                if !admissible(next, from) {
                    continue;
                }
                let obstacle_neighbors = ORTHOGONAL
                    .iter()
                    .filter(|&&(dr2, dc2)| grid.is_obstacle((next.0 + dr2, next.1 + dc2)))
                    .count();
                let corner_bonus = if obstacle_neighbors >= 2 { 5.0 } else { 0.0 };
                let score = 2.0 * grid.corridor_score(next) as f64 - 0.5 * (depth + 1) as f64 + corner_bonus;
                if best.is_none_or(|(_, b)| score > b) {
                    best = Some((next, score));
                }
                frontier.push((next, depth + 1));
            }
        }

        best.and_then(|(cell, _)| {
            if GridOps::manhattan(from, cell) > MAX_EVAC_DISTANCE {
                None
            } else {
                Some(cell)
            }
        })
    }
}
