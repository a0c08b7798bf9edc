//! `logix-engine` — the tick loop, pathfinder, deadlock resolver, and task
//! manager for the logistics simulation.
//!
//! These four concerns share one [`AgentArena`][logix_agent::AgentArena] and
//! one [`ReservationTable`][logix_grid::ReservationTable] every tick, so they
//! live in a single crate rather than being split further.
//!
//! # Tick loop
//!
//! ```text
//! for each call to Sim::step():
//!   ① maintenance   — advance clock, purge old reservations, fix_robot_states,
//!                      periodic cleanup_orphaned_assignments/reassign/force-idle
//!   ② deadlock      — detect wait-chain groups; resolve each with an emergency move
//!   ③ timeouts      — EVACUATING/YIELDING timeouts, oscillation reset
//!   ④ critical evac — move IDLE/HOME agents off a carrier's critical path
//!   ⑤ decisive      — per-agent yield/repath/retreat/emergency ladder
//!   ⑥ plan          — Pathfinder::find_path for agents lacking a path
//!   ⑦ arbitrate     — commit planned moves in priority order, reject swaps
//!   ⑧ transitions   — pickup/dropoff/home/evac state transitions on commit
//!   ⑨ termination   — all delivered & home, or tick > max_steps
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use logix_engine::{NoopObserver, SimBuilder, Tunables};
//! use logix_oracle::NoopOracle;
//!
//! let mut sim = SimBuilder::new(dims, obstacles, agents, packages, NoopOracle, Tunables::default())
//!     .build()?;
//! sim.run(&mut NoopObserver);
//! ```

pub mod builder;
pub mod error;
pub mod events;
pub mod pathfind;
pub mod resolve;
pub mod sim;
pub mod tasks;
pub mod tunables;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{EngineError, EngineResult};
pub use events::{DomainEvent, NoopObserver, SimObserver};
pub use pathfind::Pathfinder;
pub use resolve::DeadlockResolver;
pub use sim::{Sim, SimOutcome};
pub use tasks::TaskManager;
pub use tunables::Tunables;
