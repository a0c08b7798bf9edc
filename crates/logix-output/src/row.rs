//! Plain data row types written by output backends.

use logix_engine::DomainEvent;

/// Sentinel for an absent agent/package/cell field in a row that otherwise
/// carries one. Mirrors the `INVALID`-sentinel idiom used by the typed ids
/// in `logix-core`, but as a plain integer so it round-trips through CSV and
/// SQLite without a nullable column.
pub const NONE: i64 = -1;

/// One row per [`DomainEvent`] raised during a run, flattened to plain
/// columns for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRow {
    pub tick: u64,
    pub kind: &'static str,
    pub agent_id: i64,
    /// The other agent involved, for `Yield`/`DeadlockResolved`; [`NONE`] otherwise.
    pub other_agent_id: i64,
    pub package_id: i64,
    pub from_row: i64,
    pub from_col: i64,
    pub to_row: i64,
    pub to_col: i64,
}

fn cell_parts(cell: (i32, i32)) -> (i64, i64) {
    (cell.0 as i64, cell.1 as i64)
}

/// Flatten one [`DomainEvent`] into an [`EventRow`].
pub fn event_row(event: &DomainEvent) -> EventRow {
    let base = EventRow {
        tick: 0,
        kind: "",
        agent_id: NONE,
        other_agent_id: NONE,
        package_id: NONE,
        from_row: NONE,
        from_col: NONE,
        to_row: NONE,
        to_col: NONE,
    };

    match *event {
        DomainEvent::Move { agent, from, to, tick } => {
            let (fr, fc) = cell_parts(from);
            let (tr, tc) = cell_parts(to);
            EventRow { tick: tick.0, kind: "move", agent_id: agent.0 as i64, from_row: fr, from_col: fc, to_row: tr, to_col: tc, ..base }
        }
        DomainEvent::Blocked { agent, at, tick } => {
            let (r, c) = cell_parts(at);
            EventRow { tick: tick.0, kind: "blocked", agent_id: agent.0 as i64, from_row: r, from_col: c, ..base }
        }
        DomainEvent::Pickup { agent, package, at, tick } => {
            let (r, c) = cell_parts(at);
            EventRow { tick: tick.0, kind: "pickup", agent_id: agent.0 as i64, package_id: package.0 as i64, from_row: r, from_col: c, ..base }
        }
        DomainEvent::Dropoff { agent, package, at, tick } => {
            let (r, c) = cell_parts(at);
            EventRow { tick: tick.0, kind: "dropoff", agent_id: agent.0 as i64, package_id: package.0 as i64, from_row: r, from_col: c, ..base }
        }
        DomainEvent::Yield { agent, yield_to, to, tick } => {
            let (r, c) = cell_parts(to);
            EventRow { tick: tick.0, kind: "yield", agent_id: agent.0 as i64, other_agent_id: yield_to.0 as i64, to_row: r, to_col: c, ..base }
        }
        DomainEvent::Retreat { agent, to, tick } => {
            let (r, c) = cell_parts(to);
            EventRow { tick: tick.0, kind: "retreat", agent_id: agent.0 as i64, to_row: r, to_col: c, ..base }
        }
        DomainEvent::Emergency { agent, to, tick } => {
            let (r, c) = cell_parts(to);
            EventRow { tick: tick.0, kind: "emergency", agent_id: agent.0 as i64, to_row: r, to_col: c, ..base }
        }
        DomainEvent::DeadlockResolved { agent, group_size, tick } => {
            EventRow { tick: tick.0, kind: "deadlock_resolved", agent_id: agent.0 as i64, package_id: group_size as i64, ..base }
        }
    }
}

/// Per-tick counts of each event kind, for a quick-glance progress log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummaryRow {
    pub tick: u64,
    pub moves: u64,
    pub blocked: u64,
    pub pickups: u64,
    pub dropoffs: u64,
    pub yields: u64,
    pub retreats: u64,
    pub emergencies: u64,
    pub deadlocks_resolved: u64,
}

impl TickSummaryRow {
    /// Tally one tick's events into a summary row.
    pub fn tally(tick: u64, events: &[DomainEvent]) -> Self {
        let mut row = Self { tick, ..Self::default() };
        for event in events {
            match event {
                DomainEvent::Move { .. } => row.moves += 1,
                DomainEvent::Blocked { .. } => row.blocked += 1,
                DomainEvent::Pickup { .. } => row.pickups += 1,
                DomainEvent::Dropoff { .. } => row.dropoffs += 1,
                DomainEvent::Yield { .. } => row.yields += 1,
                DomainEvent::Retreat { .. } => row.retreats += 1,
                DomainEvent::Emergency { .. } => row.emergencies += 1,
                DomainEvent::DeadlockResolved { .. } => row.deadlocks_resolved += 1,
            }
        }
        row
    }
}
