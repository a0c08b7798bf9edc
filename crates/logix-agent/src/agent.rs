//! The agent (robot) value type.
//!
//! One `Agent` record holds everything the engine needs to decide and apply
//! that agent's move on a given tick — a single named-field struct, not a
//! column per field. See `AgentArena` for how these are stored.

use logix_core::{AgentId, Cell, PackageId, Tick};

/// Maximum number of recent positions kept for oscillation detection.
const POSITION_HISTORY_CAP: usize = 10;

/// High-level task state, mirrors the state-priority ladder used for
/// conflict tie-breaking (`TO_DROPOFF` > `TO_PICKUP` > `EVACUATING` > `HOME`
/// > `IDLE`).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentState {
    Idle,
    ToPickup,
    ToDropoff,
    Evacuating,
    Home,
}

impl AgentState {
    /// Base priority contribution used by [`Agent::priority`].
    pub fn base_priority(self) -> i64 {
        match self {
            AgentState::ToDropoff => 3000,
            AgentState::ToPickup => 2000,
            AgentState::Evacuating => 1500,
            AgentState::Home => 1000,
            AgentState::Idle => 0,
        }
    }
}

/// Which rung of the decisive-action ladder an agent currently occupies.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionMode {
    #[default]
    Normal,
    Yield,
    Retreat,
    Emergency,
}

/// A single robot.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    /// The cell this agent returns to once idle. Fixed at spawn.
    pub home: Cell,
    pub pos: Cell,
    pub state: AgentState,
    pub decision_mode: DecisionMode,
    pub package: Option<PackageId>,
    pub path: Vec<Cell>,
    /// Goal cells the planner has recently failed to reach; cleared whenever
    /// a fresh plan attempt is made so stale failures don't block retries.
    pub failed_paths: Vec<Cell>,
    pub wait_count: u32,
    pub last_dir: (i32, i32),
    pub momentum: u32,
    pub yield_to: Option<AgentId>,
    pub yield_start_tick: Option<Tick>,
    pub evac_target: Option<Cell>,
    pub evac_start_tick: Option<Tick>,
    pub position_history: Vec<Cell>,
    /// Tick at which the decisive-action ladder last acted on this agent.
    pub last_decision_step: Tick,
    /// Cell the decisive-action ladder last found this agent stuck at, used
    /// to tell "still stuck in the same place" from "stuck again elsewhere".
    pub stuck_at: Option<Cell>,
    /// Consecutive decisive-action passes spent stuck at `stuck_at`.
    pub stuck_count: u32,
    /// Lifetime count of single-cell moves, for end-of-run statistics.
    pub total_turns: u32,
}

impl Agent {
    /// Construct a fresh, idle agent at `pos`.
    pub fn new(id: AgentId, name: impl Into<String>, pos: Cell) -> Self {
        Self {
            id,
            name: name.into(),
            home: pos,
            pos,
            state: AgentState::Idle,
            decision_mode: DecisionMode::Normal,
            package: None,
            path: Vec::new(),
            failed_paths: Vec::new(),
            wait_count: 0,
            last_dir: (0, 0),
            momentum: 0,
            yield_to: None,
            yield_start_tick: None,
            evac_target: None,
            evac_start_tick: None,
            position_history: Vec::new(),
            last_decision_step: Tick::ZERO,
            stuck_at: None,
            stuck_count: 0,
            total_turns: 0,
        }
    }

    /// Tie-break priority: state base + wait bonus + remaining-path bonus +
    /// momentum bonus.
    pub fn priority(&self) -> i64 {
        let base = self.state.base_priority();
        let wait_bonus = self.wait_count as i64 * 100;
        let dist_bonus = if self.path.is_empty() {
            0
        } else {
            500 - self.path.len().min(500) as i64
        };
        let momentum_bonus = self.momentum as i64 * 50;
        base + wait_bonus + dist_bonus + momentum_bonus
    }

    /// Record `pos` into the rolling position history, capped at
    /// [`POSITION_HISTORY_CAP`] entries.
    pub fn record_position(&mut self, pos: Cell) {
        self.position_history.push(pos);
        if self.position_history.len() > POSITION_HISTORY_CAP {
            self.position_history.remove(0);
        }
    }

    pub fn clear_oscillation_history(&mut self) {
        self.position_history.clear();
    }

    /// Has the agent been shuffling between a small set of cells over the
    /// last `window` recorded positions?
    pub fn detect_oscillation(&self, window: usize) -> bool {
        if self.position_history.len() < window {
            return false;
        }
        let recent = &self.position_history[self.position_history.len() - window..];
        let mut unique = recent.to_vec();
        unique.sort_unstable();
        unique.dedup();
        unique.len() <= 3
    }

    /// Reset all per-episode transient state to the values `force_reset`
    /// uses when pulling a hard-stuck agent back to `IDLE`.
    pub fn force_reset_to_idle(&mut self) {
        self.state = AgentState::Idle;
        self.decision_mode = DecisionMode::Normal;
        self.path.clear();
        self.failed_paths.clear();
        self.evac_target = None;
        self.evac_start_tick = None;
        self.yield_to = None;
        self.yield_start_tick = None;
        self.wait_count = 0;
        self.position_history.clear();
        self.momentum = 0;
        self.stuck_at = None;
        self.stuck_count = 0;
    }
}
