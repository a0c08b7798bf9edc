//! Domain events emitted by the tick scheduler, and the observer trait that
//! receives them.

use logix_core::{AgentId, Cell, PackageId, Tick};

/// One event raised during a single [`crate::Sim::step`] call.
///
/// Carries enough to reconstruct what happened without requiring the
/// observer to poll agent/package state itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DomainEvent {
    /// `agent` moved from `from` to `to` at `tick`.
    Move {
        agent: AgentId,
        from: Cell,
        to: Cell,
        tick: Tick,
    },
    /// `agent` failed to move this tick; its intended destination was unsafe,
    /// occupied, or reserved.
    Blocked { agent: AgentId, at: Cell, tick: Tick },
    /// `agent` picked up `package` at `at`.
    Pickup {
        agent: AgentId,
        package: PackageId,
        at: Cell,
        tick: Tick,
    },
    /// `agent` delivered `package` at `at`.
    Dropoff {
        agent: AgentId,
        package: PackageId,
        at: Cell,
        tick: Tick,
    },
    /// `agent` stepped aside to `to` in favor of `yield_to`.
    Yield {
        agent: AgentId,
        yield_to: AgentId,
        to: Cell,
        tick: Tick,
    },
    /// `agent` retreated along a short path away from a blocker.
    Retreat { agent: AgentId, to: Cell, tick: Tick },
    /// `agent` took an unplanned single-step emergency move to `to`.
    Emergency { agent: AgentId, to: Cell, tick: Tick },
    /// A deadlock group was detected and resolved by forcing `agent` to move.
    DeadlockResolved {
        agent: AgentId,
        group_size: usize,
        tick: Tick,
    },
}

/// Callbacks invoked by [`crate::Sim::step`] as events occur.
///
/// All methods have no-op default implementations; implementors override
/// only what they care about.
pub trait SimObserver {
    fn on_event(&mut self, _event: DomainEvent) {}

    /// Called once at the end of every tick with a full event batch, in
    /// addition to the per-event `on_event` calls above.
    fn on_tick_end(&mut self, _tick: Tick, _events: &[DomainEvent]) {}

    /// Called once after the simulation reaches termination (delivered or timeout).
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
