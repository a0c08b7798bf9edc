//! Time-space A* pathfinder: single-agent search through `(cell, tick,
//! facing)` space with a reservation table, cost shaping, and a plain-A*
//! fallback when the time-space search comes up empty.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use logix_agent::{Agent, AgentArena, AgentState, PackageArena, PackageStatus};
use logix_core::{AgentId, Cell, GridOps, Tick};
use logix_grid::{CorridorMap, Grid, ReservationTable};
use logix_oracle::{DeadlockFeatures, DeadlockRiskOracle};

use crate::Tunables;

/// Agents at or above this priority are exempt from the narrow-passage cost
/// penalty (they are close enough to TO_PICKUP/TO_DROPOFF urgency).
const NARROW_PASSAGE_PRIORITY_EXEMPT: i64 = 2000;
/// An agent only starts paying the oracle's deadlock-risk term once it has
/// waited this long.
const ORACLE_MIN_WAIT: u32 = 5;
/// How many cached routes to keep before evicting the least-recently-used.
const CACHE_CAPACITY: usize = 256;
/// How many steps of another agent's existing plan count as "predicted
/// future traffic" when shaping a candidate move's cost.
const TRAFFIC_LOOKAHEAD: usize = 3;
/// Multiplier applied to a step that continues the corridor map's overall
/// flow direction — a soft tiebreak among otherwise-equal successors, per
/// `CorridorMap::flow_direction`.
const FLOW_ALIGNMENT_BONUS: f64 = 0.98;

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

// ── Ordering wrapper for the open-set priority queue ────────────────────────

/// Wraps an `f64` cost so a plain `BinaryHeap` (a max-heap) pops the
/// *smallest* cost first. `f64` isn't `Ord` on its own because of `NaN`;
/// costs here are always finite sums of bounded positive weights.
#[derive(Copy, Clone, Debug)]
struct MinCost(f64);

impl PartialEq for MinCost {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
impl Eq for MinCost {}
impl PartialOrd for MinCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for MinCost {
    fn cmp(&self, other: &Self) -> Ordering {
        other.0.partial_cmp(&self.0).unwrap_or(Ordering::Equal)
    }
}

/// One open-set entry. `seq` breaks ties between equal-`f` entries by
/// insertion order, so the search is deterministic regardless of hashmap
/// iteration order.
struct QueueEntry<S> {
    f: MinCost,
    seq: u64,
    g: f64,
    state: S,
    path: Vec<Cell>,
    consecutive_waits: u32,
}

impl<S> PartialEq for QueueEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}
impl<S> Eq for QueueEntry<S> {}
impl<S> PartialOrd for QueueEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<S> Ord for QueueEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f.cmp(&other.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

// ── Path cache ───────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    start: Cell,
    goal: Cell,
    state: AgentState,
}

struct CacheEntry {
    path: Vec<Cell>,
    last_accessed: u64,
}

#[derive(Default)]
struct PathCache {
    entries: HashMap<CacheKey, CacheEntry>,
    clock: u64,
}

impl PathCache {
    fn get(&mut self, key: &CacheKey) -> Option<Vec<Cell>> {
        self.clock += 1;
        let clock = self.clock;
        self.entries.get_mut(key).map(|e| {
            e.last_accessed = clock;
            e.path.clone()
        })
    }

    fn put(&mut self, key: CacheKey, path: Vec<Cell>) {
        self.clock += 1;
        if self.entries.len() >= CACHE_CAPACITY && !self.entries.contains_key(&key) {
            if let Some(victim) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_accessed)
                .map(|(k, _)| k.clone())
            {
                self.entries.remove(&victim);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                path,
                last_accessed: self.clock,
            },
        );
    }

    /// Drop every cached route whose path crosses a newly blocked cell.
    fn invalidate_intersecting(&mut self, blocked: &HashSet<Cell>) {
        self.entries.retain(|_, e| !e.path.iter().any(|c| blocked.contains(c)));
    }
}

// ── Pathfinder ───────────────────────────────────────────────────────────────

/// Plans single-agent routes through the shared grid, respecting the
/// reservation table and the engine's full cost-shaping formula.
///
/// Generic over the deadlock-risk oracle so tests can inject a stub.
pub struct Pathfinder<Ora: DeadlockRiskOracle> {
    grid: Grid,
    corridors: CorridorMap,
    reservations: ReservationTable,
    cache: PathCache,
    oracle: Ora,
    tunables: Tunables,
    seq: u64,
}

impl<Ora: DeadlockRiskOracle> Pathfinder<Ora> {
    pub fn new(grid: Grid, corridors: CorridorMap, oracle: Ora, tunables: Tunables) -> Self {
        Self {
            grid,
            corridors,
            reservations: ReservationTable::new(),
            cache: PathCache::default(),
            oracle,
            tunables,
            seq: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn reservations(&self) -> &ReservationTable {
        &self.reservations
    }

    pub fn reservations_mut(&mut self) -> &mut ReservationTable {
        &mut self.reservations
    }

    /// Purge reservations older than `current` tick.
    pub fn advance_clock(&mut self, current: Tick) {
        self.reservations.clear_old(current);
    }

    /// Plan a path from `agent.pos` to `goal`, preferring the time-space
    /// search and falling back to a plain spatial A* if it fails. On
    /// success, books the returned path into the reservation table under
    /// the agent's id.
    pub fn find_path(
        &mut self,
        agent: &Agent,
        goal: Cell,
        start_tick: Tick,
        blocked: &HashSet<Cell>,
        agents: &AgentArena,
        packages: &PackageArena,
    ) -> Vec<Cell> {
        if agent.pos == goal {
            return Vec::new();
        }

        let key = CacheKey {
            start: agent.pos,
            goal,
            state: agent.state,
        };

        if agent.wait_count == 0 {
            self.cache.invalidate_intersecting(blocked);
            if let Some(cached) = self.cache.get(&key) {
                if !cached.iter().any(|c| blocked.contains(c)) {
                    self.reservations
                        .reserve_path(agent.id, &cached, start_tick, self.tunables.time_horizon);
                    return cached;
                }
            }
        }

        let mut path = self.time_space_astar(agent, goal, start_tick, blocked, agents, packages);
        if path.is_empty() {
            path = self.plain_astar(agent, goal, blocked, packages);
        }

        if !path.is_empty() {
            self.reservations
                .reserve_path(agent.id, &path, start_tick, self.tunables.time_horizon);
            if agent.wait_count == 0 {
                self.cache.put(key, path.clone());
            }
        }
        path
    }

    // ── Hard constraints shared by both searches ───────────────────────────

    fn can_enter_dropoff(&self, agent: &Agent, pos: Cell, packages: &PackageArena) -> bool {
        for package in packages.iter() {
            if package.dropoff != pos || package.status != PackageStatus::Picked {
                continue;
            }
            let is_owner = package.assigned_to == Some(agent.id)
                && agent.state == AgentState::ToDropoff
                && agent.package == Some(package.id);
            if !is_owner {
                return false;
            }
        }
        true
    }

    fn can_enter_pickup(&self, agent: &Agent, pos: Cell, packages: &PackageArena) -> bool {
        for package in packages.iter() {
            if package.pickup != pos || package.status != PackageStatus::Waiting {
                continue;
            }
            let is_claimant = agent.state == AgentState::ToPickup && agent.package == Some(package.id);
            if !is_claimant {
                return false;
            }
        }
        true
    }

    fn cell_admissible(
        &self,
        agent: &Agent,
        next: Cell,
        goal: Cell,
        blocked: &HashSet<Cell>,
        packages: &PackageArena,
    ) -> bool {
        if !self.grid.in_bounds(next) || self.grid.is_obstacle(next) || blocked.contains(&next) {
            return false;
        }
        if next == goal {
            return true;
        }
        self.can_enter_dropoff(agent, next, packages) && self.can_enter_pickup(agent, next, packages)
    }

    // ── Cost shaping ────────────────────────────────────────────────────────

    fn step_cost(&self, agent: &Agent, last_dir: (i32, i32), move_dir: (i32, i32), next: Cell, momentum: u32) -> f64 {
        let mut cost = 1.0;
        cost += (agent.id.index() % 3) as f64 * 0.15;
        if GridOps::is_turn(last_dir, move_dir) {
            cost += self.tunables.turn_penalty * 0.7;
        }

        let cscore = self.grid.corridor_score(next);
        if cscore >= 6 {
            cost *= self.tunables.corridor_bonus;
        } else if cscore <= 2 {
            cost *= 1.3;
        }

        let highway = self.corridors.highway_bonus(next);
        if highway > 0.0 {
            cost *= (1.0 - highway * 0.03).max(0.85);
        }
        if self.corridors.is_on_main_corridor(next) {
            cost *= 0.92;
        }

        let flow = self.corridors.preferred_direction(agent.state == AgentState::ToDropoff);
        if flow != (0, 0) && move_dir == flow {
            cost *= FLOW_ALIGNMENT_BONUS;
        }

        if move_dir == last_dir && momentum > 0 {
            cost *= (1.0 - 0.06 * momentum as f64).max(0.65);
        }

        if self.grid.is_narrow_passage(next) && agent.priority() < NARROW_PASSAGE_PRIORITY_EXEMPT {
            cost *= 1.5;
        }

        cost + self.oracle_cost(agent, next)
    }

    /// Additive deadlock-risk term from the oracle, gated on the agent
    /// having waited long enough for it to be worth asking about.
    fn oracle_cost(&self, agent: &Agent, next: Cell) -> f64 {
        if agent.wait_count < ORACLE_MIN_WAIT || agent.state == AgentState::Idle {
            return 0.0;
        }
        let features = DeadlockFeatures {
            from_row: agent.pos.0,
            from_col: agent.pos.1,
            to_row: next.0,
            to_col: next.1,
            wait: agent.wait_count,
        };
        let p = self.oracle.predict(&features).p_deadlock();
        let mut term = (p * 2.0).min(1.5);
        let move_dir = GridOps::direction(agent.pos, next);
        if move_dir == agent.last_dir {
            term *= 0.3;
        }
        term
    }

    /// Penalize routing through a cell another agent's existing plan already
    /// predicts occupying in the next few ticks.
    fn dynamic_traffic_cost(&self, next: Cell, agents: &AgentArena, exclude: AgentId) -> f64 {
        let mut cost = 0.0;
        for other in agents.iter() {
            if other.id == exclude {
                continue;
            }
            for (i, &cell) in other.path.iter().take(TRAFFIC_LOOKAHEAD).enumerate() {
                if cell == next {
                    cost += 0.4 / (i as f64 + 1.0);
                }
            }
        }
        cost
    }

    fn heuristic(&self, from: Cell, next: Cell, goal: Cell, last_dir: (i32, i32), momentum: u32) -> f64 {
        let move_dir = GridOps::direction(from, next);
        let goal_dir = GridOps::direction(from, goal);
        let aligns = (goal_dir.0 != 0 && move_dir.0 == goal_dir.0) || (goal_dir.1 != 0 && move_dir.1 == goal_dir.1);
        let bias = if aligns {
            0.92
        } else if momentum >= 3 && move_dir == last_dir {
            0.95
        } else {
            1.0
        };
        GridOps::manhattan(next, goal) as f64 * bias
    }

    // ── Time-space A* ───────────────────────────────────────────────────────

    fn time_space_astar(
        &mut self,
        agent: &Agent,
        goal: Cell,
        start_tick: Tick,
        blocked: &HashSet<Cell>,
        agents: &AgentArena,
        packages: &PackageArena,
    ) -> Vec<Cell> {
        type State = (Cell, Tick, (i32, i32), u32);

        let horizon = start_tick.offset(self.tunables.time_horizon);
        let start_state: State = (agent.pos, start_tick, agent.last_dir, agent.momentum.min(5));

        let mut open: BinaryHeap<QueueEntry<State>> = BinaryHeap::new();
        let mut best_g: HashMap<State, f64> = HashMap::new();
        best_g.insert(start_state, 0.0);
        self.seq += 1;
        open.push(QueueEntry {
            f: MinCost(self.heuristic(agent.pos, agent.pos, goal, agent.last_dir, agent.momentum) as f64 * 0.0),
            seq: self.seq,
            g: 0.0,
            state: start_state,
            path: Vec::new(),
            consecutive_waits: 0,
        });

        while let Some(entry) = open.pop() {
            let (cell, tick, last_dir, momentum) = entry.state;
            if let Some(&known) = best_g.get(&entry.state) {
                if entry.g > known {
                    continue;
                }
            }
            if cell == goal {
                return entry.path;
            }
            if tick >= horizon {
                continue;
            }

            for &move_dir in &ORTHOGONAL {
                let next = (cell.0 + move_dir.0, cell.1 + move_dir.1);
                if !self.cell_admissible(agent, next, goal, blocked, packages) {
                    continue;
                }
                let next_tick = tick.next();
                if self.reservations.is_reserved(next, next_tick, Some(agent.id)) {
                    continue;
                }
                if self.reservations.would_swap(agent.id, cell, next, tick) {
                    continue;
                }

                let next_momentum = if move_dir == last_dir { (momentum + 1).min(5) } else { 0 };
                let g = entry.g
                    + self.step_cost(agent, last_dir, move_dir, next, momentum)
                    + self.dynamic_traffic_cost(next, agents, agent.id);
                let next_state: State = (next, next_tick, move_dir, next_momentum);
                if let Some(&known) = best_g.get(&next_state) {
                    if g >= known {
                        continue;
                    }
                }
                best_g.insert(next_state, g);
                let h = self.heuristic(cell, next, goal, last_dir, momentum);
                let mut path = entry.path.clone();
                path.push(next);
                self.seq += 1;
                open.push(QueueEntry {
                    f: MinCost(g + h),
                    seq: self.seq,
                    g,
                    state: next_state,
                    path,
                    consecutive_waits: 0,
                });
            }

            // WAIT: stay, advance time.
            if entry.consecutive_waits < self.tunables.max_wait_actions
                && !self.reservations.is_reserved(cell, tick.next(), Some(agent.id))
            {
                let next_tick = tick.next();
                let next_state: State = (cell, next_tick, last_dir, 0);
                let g = entry.g + self.tunables.wait_cost;
                if best_g.get(&next_state).is_none_or(|&known| g < known) {
                    best_g.insert(next_state, g);
                    let h = GridOps::manhattan(cell, goal) as f64;
                    let mut path = entry.path.clone();
                    path.push(cell);
                    self.seq += 1;
                    open.push(QueueEntry {
                        f: MinCost(g + h),
                        seq: self.seq,
                        g,
                        state: next_state,
                        path,
                        consecutive_waits: entry.consecutive_waits + 1,
                    });
                }
            }
        }

        Vec::new()
    }

    // ── Plain A* fallback (no time dimension, no reservations) ─────────────

    fn plain_astar(&mut self, agent: &Agent, goal: Cell, blocked: &HashSet<Cell>, packages: &PackageArena) -> Vec<Cell> {
        type State = (Cell, (i32, i32), u32);

        let start_state: State = (agent.pos, agent.last_dir, agent.momentum.min(5));
        let mut open: BinaryHeap<QueueEntry<State>> = BinaryHeap::new();
        let mut best_g: HashMap<State, f64> = HashMap::new();
        best_g.insert(start_state, 0.0);
        self.seq += 1;
        open.push(QueueEntry {
            f: MinCost(GridOps::manhattan(agent.pos, goal) as f64),
            seq: self.seq,
            g: 0.0,
            state: start_state,
            path: Vec::new(),
            consecutive_waits: 0,
        });

        while let Some(entry) = open.pop() {
            let (cell, last_dir, momentum) = entry.state;
            if let Some(&known) = best_g.get(&entry.state) {
                if entry.g > known {
                    continue;
                }
            }
            if cell == goal {
                return entry.path;
            }

            for &move_dir in &ORTHOGONAL {
                let next = (cell.0 + move_dir.0, cell.1 + move_dir.1);
                if !self.cell_admissible(agent, next, goal, blocked, packages) {
                    continue;
                }
                let next_momentum = if move_dir == last_dir { (momentum + 1).min(5) } else { 0 };
                let g = entry.g + self.step_cost(agent, last_dir, move_dir, next, momentum);
                let next_state: State = (next, move_dir, next_momentum);
                if let Some(&known) = best_g.get(&next_state) {
                    if g >= known {
                        continue;
                    }
                }
                best_g.insert(next_state, g);
                let h = self.heuristic(cell, next, goal, last_dir, momentum);
                let mut path = entry.path.clone();
                path.push(next);
                self.seq += 1;
                open.push(QueueEntry {
                    f: MinCost(g + h),
                    seq: self.seq,
                    g,
                    state: next_state,
                    path,
                    consecutive_waits: 0,
                });
            }
        }

        Vec::new()
    }
}
