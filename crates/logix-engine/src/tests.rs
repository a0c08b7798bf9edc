//! End-to-end tests driving [`Sim`] through its public `step`/`run` API,
//! grounded in the scenarios used to pin down the tick scheduler's behavior.

use std::collections::HashSet;

use logix_agent::{AgentArenaBuilder, AgentState, PackageArenaBuilder, PackageStatus};
use logix_core::{Cell, GridDims, GridOps};
use logix_oracle::NoopOracle;

use crate::{NoopObserver, SimBuilder, SimOutcome, Tunables};

fn dims(n: i32) -> GridDims {
    GridDims::new(n, n)
}

#[test]
fn straight_delivery_reaches_dropoff_and_returns_home() {
    let agents = AgentArenaBuilder::new().push("R1", (0, 0)).build().unwrap();
    let packages = PackageArenaBuilder::new().push("P1", (0, 5), (5, 5)).build().unwrap();

    let mut sim = SimBuilder::new(dims(10), HashSet::new(), agents, packages, NoopOracle, Tunables::default())
        .build()
        .unwrap();

    let outcome = sim.run(&mut NoopObserver);
    assert!(matches!(outcome, SimOutcome::Delivered { .. }), "expected delivery, got {outcome:?}");

    let package = sim.packages().get(logix_core::PackageId(0));
    assert_eq!(package.status, PackageStatus::Delivered);

    let agent = sim.agents().get(logix_core::AgentId(0));
    assert_eq!(agent.state, AgentState::Idle);
    assert_eq!(agent.pos, agent.home);
}

#[test]
fn head_on_agents_never_collide_and_both_deliver() {
    let agents = AgentArenaBuilder::new()
        .push("R1", (0, 0))
        .push("R2", (0, 4))
        .build()
        .unwrap();
    let packages = PackageArenaBuilder::new()
        .push("Pa", (0, 0), (0, 4))
        .push("Pb", (0, 4), (0, 0))
        .build()
        .unwrap();

    let mut sim = SimBuilder::new(dims(10), HashSet::new(), agents, packages, NoopOracle, Tunables::default())
        .build()
        .unwrap();

    for _ in 0..Tunables::default().max_steps {
        if sim.packages().iter().all(|p| p.status == PackageStatus::Delivered) {
            break;
        }
        sim.step();

        let positions: Vec<Cell> = sim.agents().iter().map(|a| a.pos).collect();
        let mut unique = positions.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), positions.len(), "two agents occupied the same cell");
    }

    assert!(sim.packages().iter().all(|p| p.status == PackageStatus::Delivered));
}

#[test]
fn choke_point_lets_exactly_one_agent_through_at_a_time() {
    // A 1-wide gap at (5, 3) in an otherwise solid column 3 wall.
    let mut obstacles = HashSet::new();
    for r in 0..10 {
        if r != 5 {
            obstacles.insert((r, 3));
        }
    }

    let agents = AgentArenaBuilder::new()
        .push("R1", (0, 1))
        .push("R2", (0, 8))
        .build()
        .unwrap();
    let packages = PackageArenaBuilder::new()
        .push("Pa", (0, 1), (0, 8))
        .push("Pb", (0, 8), (0, 1))
        .build()
        .unwrap();

    let mut sim = SimBuilder::new(dims(10), obstacles, agents, packages, NoopOracle, Tunables::default())
        .build()
        .unwrap();

    let outcome = sim.run(&mut NoopObserver);
    assert!(matches!(outcome, SimOutcome::Delivered { .. }), "choke point deadlocked: {outcome:?}");
}

#[test]
fn orphaned_package_is_reassigned_to_a_reachable_agent() {
    // A is walled into a 1x1 box; B is free. Both claim nothing yet — the
    // task manager should hand the package to B once A's assignment (forced
    // manually here) goes stale.
    let mut obstacles = HashSet::new();
    for (r, c) in [(0, 1), (1, 0), (1, 2), (2, 1)] {
        obstacles.insert((r, c));
    }

    let mut agents = AgentArenaBuilder::new()
        .push("Pinned", (1, 1))
        .push("Free", (8, 8))
        .build()
        .unwrap();
    let mut packages = PackageArenaBuilder::new().push("P1", (5, 5), (9, 9)).build().unwrap();

    let pinned = logix_core::AgentId(0);
    let pkg = logix_core::PackageId(0);
    agents.get_mut(pinned).state = AgentState::ToPickup;
    agents.get_mut(pinned).package = Some(pkg);
    packages.get_mut(pkg).assigned_to = Some(pinned);

    let mut sim = SimBuilder::new(dims(10), obstacles, agents, packages, NoopOracle, Tunables::default())
        .build()
        .unwrap();

    let outcome = sim.run(&mut NoopObserver);
    assert!(matches!(outcome, SimOutcome::Delivered { .. }), "orphan never reassigned: {outcome:?}");
    assert_eq!(sim.packages().get(pkg).status, PackageStatus::Delivered);
}

#[test]
fn idle_tick_is_a_no_op_on_positions() {
    let agents = AgentArenaBuilder::new().push("R1", (2, 2)).build().unwrap();
    let packages = PackageArenaBuilder::new().build().unwrap();

    let mut sim = SimBuilder::new(dims(10), HashSet::new(), agents, packages, NoopOracle, Tunables::default())
        .build()
        .unwrap();

    let before = sim.agents().get(logix_core::AgentId(0)).pos;
    let events = sim.step();
    let after = sim.agents().get(logix_core::AgentId(0)).pos;

    assert_eq!(before, after);
    assert!(events.is_empty(), "idle agent produced events: {events:?}");
}

#[test]
fn deadlock_cycle_resolves_and_simulation_completes() {
    // Three agents arranged so each one's assigned package sits on the next
    // agent's current cell — every agent's planned next step is another
    // agent's spot, forming a 3-cycle.
    let agents = AgentArenaBuilder::new()
        .push("R1", (0, 0))
        .push("R2", (0, 1))
        .push("R3", (1, 0))
        .build()
        .unwrap();
    let packages = PackageArenaBuilder::new()
        .push("Pa", (0, 0), (0, 1))
        .push("Pb", (0, 1), (1, 0))
        .push("Pc", (1, 0), (0, 0))
        .build()
        .unwrap();

    let mut sim = SimBuilder::new(dims(10), HashSet::new(), agents, packages, NoopOracle, Tunables::default())
        .build()
        .unwrap();

    let outcome = sim.run(&mut NoopObserver);
    assert!(matches!(outcome, SimOutcome::Delivered { .. }), "cyclic deadlock never resolved: {outcome:?}");
}

#[test]
fn followed_path_only_ever_moves_one_cell_per_tick() {
    let agents = AgentArenaBuilder::new().push("R1", (0, 0)).build().unwrap();
    let packages = PackageArenaBuilder::new().push("P1", (0, 0), (3, 4)).build().unwrap();
    let mut sim = SimBuilder::new(dims(10), HashSet::new(), agents, packages, NoopOracle, Tunables::default())
        .build()
        .unwrap();

    let mut prev = sim.agents().get(logix_core::AgentId(0)).pos;
    for _ in 0..40 {
        sim.step();
        let cur = sim.agents().get(logix_core::AgentId(0)).pos;
        assert!(
            cur == prev || GridOps::manhattan(prev, cur) == 1,
            "agent teleported from {prev:?} to {cur:?}"
        );
        prev = cur;
        if sim.packages().get(logix_core::PackageId(0)).status == PackageStatus::Delivered {
            break;
        }
    }
}

#[test]
fn grid_dims_must_be_positive() {
    let agents = AgentArenaBuilder::new().push("R1", (0, 0)).build().unwrap();
    let packages = PackageArenaBuilder::new().build().unwrap();
    let err = SimBuilder::new(GridDims::new(0, 0), HashSet::new(), agents, packages, NoopOracle, Tunables::default())
        .build()
        .unwrap_err();
    assert!(matches!(err, crate::EngineError::EmptyGrid { rows: 0, cols: 0 }));
}

#[test]
fn evac_timeout_releases_the_agents_waiting_package() {
    // An agent stuck EVACUATING past the timeout still owns a WAITING
    // package (it was on its way to pick it up). The hard reset routed
    // through `apply_timeouts` must release that assignment, not just
    // flip the agent back to IDLE.
    use crate::resolve::DeadlockResolver;
    use crate::tasks::TaskManager;
    use logix_core::{AgentId, PackageId, Tick};

    let mut agents = AgentArenaBuilder::new().push("R1", (0, 0)).build().unwrap();
    let mut packages = PackageArenaBuilder::new().push("P1", (5, 5), (9, 9)).build().unwrap();

    let id = AgentId(0);
    let pkg = PackageId(0);
    {
        let agent = agents.get_mut(id);
        agent.state = AgentState::Evacuating;
        agent.package = Some(pkg);
        agent.evac_target = Some((1, 0));
        agent.evac_start_tick = Some(Tick(0));
    }
    packages.get_mut(pkg).assigned_to = Some(id);

    let resolver = DeadlockResolver::new(Tunables::default());
    let tasks = TaskManager::new(Tunables::default());

    let hard_reset = resolver.apply_timeouts(&mut agents, Tick(20));
    assert_eq!(hard_reset, vec![id], "evac timeout (>15 ticks) should have fired");

    for id in hard_reset {
        tasks.force_reset_stuck_state(id, &mut agents, &mut packages);
    }

    let agent = agents.get(id);
    assert_eq!(agent.state, AgentState::Idle);
    assert_eq!(agent.package, None, "agent must release its package reference");
    assert_eq!(packages.get(pkg).assigned_to, None, "package must no longer be claimed");
}
