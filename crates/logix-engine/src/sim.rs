//! The `Sim` struct and its tick loop: the nine-phase `TickScheduler` that
//! advances every agent, package, and reservation by exactly one tick per
//! `step()` call.

use std::collections::{HashMap, HashSet};

use logix_agent::{AgentArena, AgentState, PackageArena, PackageStatus};
use logix_core::{AgentId, Cell, GridOps, Tick};
use logix_oracle::DeadlockRiskOracle;

use crate::events::DomainEvent;
use crate::pathfind::Pathfinder;
use crate::resolve::DeadlockResolver;
use crate::tasks::TaskManager;
use crate::tunables::Tunables;
use crate::SimObserver;

/// How the simulation run ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SimOutcome {
    /// Every package was delivered and every agent settled back at home.
    Delivered { tick: Tick },
    /// The tick budget (`Tunables::max_steps`) was exhausted first.
    Timeout { tick: Tick },
}

impl SimOutcome {
    /// Process exit code: `0` on normal termination, non-zero on timeout.
    pub fn exit_code(self) -> i32 {
        match self {
            SimOutcome::Delivered { .. } => 0,
            SimOutcome::Timeout { .. } => 1,
        }
    }

    pub fn tick(self) -> Tick {
        match self {
            SimOutcome::Delivered { tick } | SimOutcome::Timeout { tick } => tick,
        }
    }
}

/// The main simulation runner: owns the agent/package arenas and drives the
/// pathfinder, deadlock resolver, and task manager through one tick at a
/// time. Create via [`crate::SimBuilder`].
pub struct Sim<Ora: DeadlockRiskOracle> {
    pub(crate) tick: Tick,
    pub(crate) agents: AgentArena,
    pub(crate) packages: PackageArena,
    pub(crate) pathfinder: Pathfinder<Ora>,
    pub(crate) resolver: DeadlockResolver,
    pub(crate) tasks: TaskManager,
    pub(crate) tunables: Tunables,
}

impl<Ora: DeadlockRiskOracle> Sim<Ora> {
    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn agents(&self) -> &AgentArena {
        &self.agents
    }

    pub fn packages(&self) -> &PackageArena {
        &self.packages
    }

    /// Run until every package is delivered and every agent is settled at
    /// home, or the tick budget is exhausted.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimOutcome {
        loop {
            if self.all_delivered_and_home() {
                let outcome = SimOutcome::Delivered { tick: self.tick };
                observer.on_sim_end(self.tick);
                return outcome;
            }
            if self.tick.0 > self.tunables.max_steps {
                let outcome = SimOutcome::Timeout { tick: self.tick };
                observer.on_sim_end(self.tick);
                return outcome;
            }
            let tick = self.tick;
            let events = self.step();
            for &event in &events {
                observer.on_event(event);
            }
            observer.on_tick_end(tick, &events);
        }
    }

    /// Advance the simulation by exactly one tick and return the domain
    /// events it produced.
    ///
    /// Phases, in order:
    /// ① maintenance ② deadlock detection ③ timeouts ④ critical-path evac
    /// ⑤ decisive action ⑥ planning ⑦ arbitration & commit ⑧ task
    /// transitions ⑨ position-history bookkeeping.
    pub fn step(&mut self) -> Vec<DomainEvent> {
        let tick = self.tick;
        let mut events = Vec::new();

        // ① maintenance
        self.pathfinder.advance_clock(tick);
        self.tasks.fix_robot_states(&mut self.agents, &self.packages);
        if self.tunables.orphan_check_interval > 0 && tick.0 % self.tunables.orphan_check_interval == 0 {
            self.tasks
                .cleanup_orphaned_assignments(&mut self.agents, &mut self.packages);
        }
        if self.tunables.idle_recheck_interval > 0 && tick.0 % self.tunables.idle_recheck_interval == 0 {
            self.tasks.reassign_stuck_packages(&mut self.agents, &mut self.packages);
            self.tasks
                .force_idle_robots_to_work(&mut self.agents, &mut self.packages, self.pathfinder.grid());
        }

        // ② deadlock detection & resolution
        self.resolver
            .detect_and_resolve(&mut self.agents, self.pathfinder.grid(), tick, &mut events);

        // ③ timeouts (EVACUATING/YIELDING/oscillation)
        let hard_reset = self.resolver.apply_timeouts(&mut self.agents, tick);
        for id in hard_reset {
            self.tasks.force_reset_stuck_state(id, &mut self.agents, &mut self.packages);
        }

        // ④ critical-path evacuation
        self.resolver
            .critical_path_evac(&mut self.agents, &self.packages, self.pathfinder.grid(), tick);

        // ⑤ per-agent decisive action
        self.resolver
            .decisive_action(&mut self.agents, self.pathfinder.grid(), tick, &mut events);

        // ⑥ planning
        let order = self.priority_order();
        let planned = self.plan_moves(&order, tick);

        // ⑦ arbitration & commit
        self.arbitrate_and_commit(&order, &planned, tick, &mut events);

        // ⑧ task transitions
        self.apply_transitions(tick, &mut events);

        // ⑨ position-history bookkeeping — every agent, every tick, so a
        // fully-idle tick is a no-op on every other mutable field.
        for agent in self.agents.iter_mut() {
            let pos = agent.pos;
            agent.record_position(pos);
        }

        self.tick = tick.next();
        events
    }

    fn all_delivered_and_home(&self) -> bool {
        self.packages.iter().all(|p| p.status == PackageStatus::Delivered)
            && self
                .agents
                .iter()
                .all(|a| a.state == AgentState::Idle && a.pos == a.home)
    }

    /// Descending-priority agent order, ties broken by ascending id — the
    /// sole source of truth for both the planning and arbitration passes.
    fn priority_order(&self) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.agents.iter().map(|a| a.id).collect();
        ids.sort_by(|&a, &b| {
            let pa = self.agents.get(a).priority();
            let pb = self.agents.get(b).priority();
            pb.cmp(&pa).then(a.cmp(&b))
        });
        ids
    }

    fn goal_for(&self, id: AgentId) -> Option<Cell> {
        let agent = self.agents.get(id);
        match agent.state {
            AgentState::ToPickup => agent.package.map(|p| self.packages.get(p).pickup),
            AgentState::ToDropoff => agent.package.map(|p| self.packages.get(p).dropoff),
            AgentState::Evacuating => agent.evac_target,
            AgentState::Home => Some(agent.home),
            AgentState::Idle => None,
        }
    }

    /// Everything that currently occupies a cell, excluding `exclude`.
    fn basic_blocked_set(&self, exclude: AgentId) -> HashSet<Cell> {
        let mut blocked = self.pathfinder.grid().obstacles().clone();
        for a in self.agents.iter() {
            if a.id != exclude {
                blocked.insert(a.pos);
            }
        }
        blocked
    }

    // ── ⑥ planning ──────────────────────────────────────────────────────────

    fn plan_moves(&mut self, order: &[AgentId], tick: Tick) -> HashMap<AgentId, Cell> {
        let mut planned = HashMap::with_capacity(order.len());
        let mut claimed: HashSet<Cell> = HashSet::new();

        for &id in order {
            let needs_plan = {
                let a = self.agents.get(id);
                a.path.is_empty() && !matches!(a.state, AgentState::Idle | AgentState::Home)
            };

            if needs_plan {
                if let Some(goal) = self.goal_for(id) {
                    let mut blocked = self.pathfinder.grid().obstacles().clone();
                    for a in self.agents.iter() {
                        if a.id != id {
                            blocked.insert(a.pos);
                        }
                    }
                    blocked.extend(claimed.iter().copied());
                    blocked.extend(self.agents.get(id).failed_paths.iter().copied());

                    let snapshot = self.agents.get(id).clone();
                    let mut path =
                        self.pathfinder
                            .find_path(&snapshot, goal, tick, &blocked, &self.agents, &self.packages);
                    if path.is_empty() {
                        let minimal = self.basic_blocked_set(id);
                        path = self
                            .pathfinder
                            .find_path(&snapshot, goal, tick, &minimal, &self.agents, &self.packages);
                    }
                    self.agents.get_mut(id).path = path;
                }
            }

            let (pos, next) = {
                let a = self.agents.get(id);
                (a.pos, a.path.first().copied())
            };
            let dest = next.unwrap_or(pos);
            if dest != pos {
                claimed.insert(dest);
            }
            planned.insert(id, dest);
        }

        planned
    }

    // ── ⑦ arbitration & commit ───────────────────────────────────────────────

    fn arbitrate_and_commit(
        &mut self,
        order: &[AgentId],
        planned: &HashMap<AgentId, Cell>,
        tick: Tick,
        events: &mut Vec<DomainEvent>,
    ) {
        let mut occupied: HashMap<Cell, AgentId> = self.agents.iter().map(|a| (a.pos, a.id)).collect();
        let mut committed: HashSet<Cell> = HashSet::new();

        for &id in order {
            let dest = planned[&id];
            let (pos, state) = {
                let a = self.agents.get(id);
                (a.pos, a.state)
            };

            if dest == pos {
                if state != AgentState::Idle {
                    let agent = self.agents.get_mut(id);
                    agent.wait_count = agent.wait_count.saturating_add(1);
                    agent.momentum = 0;
                    events.push(DomainEvent::Blocked { agent: id, at: pos, tick });
                }
                continue;
            }

            let blocked_by_occupant = occupied.get(&dest).is_some_and(|&occ| occ != id);
            let is_swap = occupied
                .get(&dest)
                .is_some_and(|&occ| occ != id && planned.get(&occ) == Some(&pos));
            let already_claimed = committed.contains(&dest);

            if blocked_by_occupant || is_swap || already_claimed {
                let agent = self.agents.get_mut(id);
                agent.wait_count = agent.wait_count.saturating_add(1);
                agent.momentum = 0;
                events.push(DomainEvent::Blocked { agent: id, at: pos, tick });
                continue;
            }

            occupied.remove(&pos);
            occupied.insert(dest, id);
            committed.insert(dest);

            let move_dir = GridOps::direction(pos, dest);
            let agent = self.agents.get_mut(id);
            let turning = GridOps::is_turn(agent.last_dir, move_dir);
            if turning {
                agent.total_turns += 1;
                agent.momentum = 0;
            } else {
                agent.momentum = (agent.momentum + 1).min(5);
            }
            agent.last_dir = move_dir;
            agent.pos = dest;
            if !agent.path.is_empty() {
                agent.path.remove(0);
            }
            agent.wait_count = 0;
            agent.failed_paths.clear();
            agent.clear_oscillation_history();
            if agent.decision_mode != logix_agent::DecisionMode::Normal && agent.state != AgentState::Evacuating {
                agent.decision_mode = logix_agent::DecisionMode::Normal;
                agent.yield_to = None;
            }
            events.push(DomainEvent::Move { agent: id, from: pos, to: dest, tick });
        }
    }

    // ── ⑧ task transitions ───────────────────────────────────────────────────

    fn apply_transitions(&mut self, tick: Tick, events: &mut Vec<DomainEvent>) {
        let ids: Vec<AgentId> = self.agents.ids().collect();
        for id in ids {
            let (state, pos, package) = {
                let a = self.agents.get(id);
                (a.state, a.pos, a.package)
            };

            match state {
                AgentState::ToPickup => {
                    let Some(pkg_id) = package else { continue };
                    if pos != self.packages.get(pkg_id).pickup {
                        continue;
                    }
                    self.packages.get_mut(pkg_id).status = PackageStatus::Picked;
                    let dropoff = self.packages.get(pkg_id).dropoff;
                    let snapshot = self.agents.get(id).clone();
                    let blocked = self.basic_blocked_set(id);
                    let path = self
                        .pathfinder
                        .find_path(&snapshot, dropoff, tick, &blocked, &self.agents, &self.packages);
                    let agent = self.agents.get_mut(id);
                    agent.state = AgentState::ToDropoff;
                    agent.path = path;
                    events.push(DomainEvent::Pickup { agent: id, package: pkg_id, at: pos, tick });
                }
                AgentState::ToDropoff => {
                    let Some(pkg_id) = package else { continue };
                    if pos != self.packages.get(pkg_id).dropoff {
                        continue;
                    }
                    self.packages.get_mut(pkg_id).status = PackageStatus::Delivered;
                    self.packages.get_mut(pkg_id).assigned_to = None;
                    self.agents.get_mut(id).package = None;
                    let home = self.agents.get(id).home;
                    let snapshot = self.agents.get(id).clone();
                    let blocked = self.basic_blocked_set(id);
                    let path = self
                        .pathfinder
                        .find_path(&snapshot, home, tick, &blocked, &self.agents, &self.packages);
                    let agent = self.agents.get_mut(id);
                    agent.state = AgentState::Home;
                    agent.path = path;
                    events.push(DomainEvent::Dropoff { agent: id, package: pkg_id, at: pos, tick });
                }
                AgentState::Home => {
                    if pos == self.agents.get(id).home {
                        let agent = self.agents.get_mut(id);
                        agent.state = AgentState::Idle;
                        agent.path.clear();
                    }
                }
                AgentState::Evacuating => {
                    if Some(pos) == self.agents.get(id).evac_target {
                        let agent = self.agents.get_mut(id);
                        agent.state = AgentState::Idle;
                        agent.evac_target = None;
                        agent.evac_start_tick = None;
                        agent.path.clear();
                    }
                }
                AgentState::Idle => {}
            }
        }
    }
}
