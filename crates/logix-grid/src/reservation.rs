//! Time-space reservation table: which agent, if any, occupies a cell at a
//! given tick. Shared by the pathfinder (to avoid planning through an
//! occupied space-time cell) and the tick scheduler (to detect swap
//! conflicts before committing a move).

use std::collections::HashMap;

use logix_core::{AgentId, Cell, Tick};

#[cfg(feature = "fx-hash")]
type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type Map<K, V> = HashMap<K, V>;

#[derive(Default)]
pub struct ReservationTable {
    /// tick -> (cell -> agent)
    by_tick: Map<Tick, Map<Cell, AgentId>>,
    /// agent -> list of (cell, tick) it currently holds
    by_agent: Map<AgentId, Vec<(Cell, Tick)>>,
}

impl ReservationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve(&mut self, agent: AgentId, cell: Cell, tick: Tick) {
        self.by_tick.entry(tick).or_default().insert(cell, agent);
        self.by_agent.entry(agent).or_default().push((cell, tick));
    }

    /// Reserve every cell of `path` starting at `start_tick`, one tick per
    /// cell, then hold the final cell for `tail_horizon` additional ticks so
    /// a robot that has arrived doesn't get walked through by a planner that
    /// hasn't noticed yet.
    pub fn reserve_path(&mut self, agent: AgentId, path: &[Cell], start_tick: Tick, tail_horizon: u64) {
        self.clear_agent(agent);
        let mut tick = start_tick;
        for &cell in path {
            self.reserve(agent, cell, tick);
            tick = tick.next();
        }
        if let Some(&last) = path.last() {
            for _ in 0..tail_horizon {
                self.reserve(agent, last, tick);
                tick = tick.next();
            }
        }
    }

    pub fn is_reserved(&self, cell: Cell, tick: Tick, exclude: Option<AgentId>) -> bool {
        match self.by_tick.get(&tick).and_then(|m| m.get(&cell)) {
            Some(&holder) => Some(holder) != exclude,
            None => false,
        }
    }

    pub fn reserved_by(&self, cell: Cell, tick: Tick) -> Option<AgentId> {
        self.by_tick.get(&tick).and_then(|m| m.get(&cell)).copied()
    }

    /// `true` if moving `agent` from `from` to `to` between `tick` and
    /// `tick.next()` would swap places with another agent moving the
    /// opposite way.
    pub fn would_swap(&self, agent: AgentId, from: Cell, to: Cell, tick: Tick) -> bool {
        match self.reserved_by(to, tick) {
            Some(other) if other != agent => self.reserved_by(from, tick.next()) == Some(other),
            _ => false,
        }
    }

    pub fn clear_agent(&mut self, agent: AgentId) {
        if let Some(entries) = self.by_agent.remove(&agent) {
            for (cell, tick) in entries {
                if let Some(m) = self.by_tick.get_mut(&tick) {
                    if m.get(&cell) == Some(&agent) {
                        m.remove(&cell);
                    }
                }
            }
        }
    }

    /// Drop every reservation strictly before `current`.
    pub fn clear_old(&mut self, current: Tick) {
        self.by_tick.retain(|&tick, _| tick >= current);
        for entries in self.by_agent.values_mut() {
            entries.retain(|&(_, tick)| tick >= current);
        }
    }
}
