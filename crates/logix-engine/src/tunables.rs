//! Threshold and weight constants driving the pathfinder, deadlock resolver,
//! and tick scheduler.
//!
//! A single record passed into [`crate::SimBuilder`] at construction, per
//! the "pass a configuration record in, avoid a global tunables module"
//! redesign — no subsystem reads a process-wide singleton.

/// Tunable weights and thresholds for one [`crate::Sim`] instance.
///
/// Ordering constraints that callers overriding these must preserve:
/// `yield_threshold < decision_wait_threshold < force_move_threshold <
/// deadlock_threshold < reassign_threshold`, `corridor_bonus < 1.0`,
/// `turn_penalty > 0.0`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tunables {
    /// Consecutive waits before the cheapest decisive action (yield) kicks in.
    pub yield_threshold: u32,
    /// Consecutive waits before deadlock-group detection considers an agent.
    pub decision_wait_threshold: u32,
    /// Consecutive waits before escalating to retreat/emergency.
    pub force_move_threshold: u32,
    /// Consecutive waits before a deadlock is treated as serious (pre-empt/emergency).
    pub deadlock_threshold: u32,
    /// Consecutive waits before `TaskManager::reassign_stuck_packages` kicks in.
    pub reassign_threshold: u32,
    /// Pathfinder time-space search depth, in ticks.
    pub time_horizon: u64,
    /// Maximum consecutive WAIT actions admissible in one planned path.
    pub max_wait_actions: u32,
    /// Fixed cost of a WAIT step; must be `> 1.0`.
    pub wait_cost: f64,
    /// Multiplier applied to a turning step's cost.
    pub turn_penalty: f64,
    /// Multiplicative bonus (`< 1.0`) for stepping onto a high-corridor-score cell.
    pub corridor_bonus: f64,
    /// Ticks between `TaskManager::cleanup_orphaned_assignments` calls.
    pub orphan_check_interval: u64,
    /// Ticks between `reassign_stuck_packages`/`force_idle_robots_to_work` calls.
    pub idle_recheck_interval: u64,
    /// Global tick budget before the simulation ends with a timeout.
    pub max_steps: u64,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            yield_threshold: 3,
            decision_wait_threshold: 6,
            force_move_threshold: 10,
            deadlock_threshold: 15,
            reassign_threshold: 12,
            time_horizon: 40,
            max_wait_actions: 6,
            wait_cost: 1.2,
            turn_penalty: 1.0,
            corridor_bonus: 0.8,
            orphan_check_interval: 5,
            idle_recheck_interval: 5,
            max_steps: 2000,
        }
    }
}
