#[cfg(test)]
mod agent_priority {
    use crate::{Agent, AgentState};
    use logix_core::AgentId;

    fn agent() -> Agent {
        Agent::new(AgentId(0), "R1", (0, 0))
    }

    #[test]
    fn idle_has_zero_base_priority() {
        let a = agent();
        assert_eq!(a.priority(), 0);
    }

    #[test]
    fn to_dropoff_outranks_to_pickup() {
        let mut a = agent();
        let mut b = agent();
        a.state = AgentState::ToDropoff;
        b.state = AgentState::ToPickup;
        assert!(a.priority() > b.priority());
    }

    #[test]
    fn wait_count_raises_priority() {
        let mut a = agent();
        let baseline = a.priority();
        a.wait_count = 3;
        assert_eq!(a.priority(), baseline + 300);
    }

    #[test]
    fn shorter_remaining_path_does_not_outrank_longer_within_same_state() {
        let mut a = agent();
        let mut b = agent();
        a.path = vec![(1, 1); 2];
        b.path = vec![(1, 1); 20];
        assert!(a.priority() > b.priority());
    }
}

#[cfg(test)]
mod oscillation {
    use crate::Agent;
    use logix_core::AgentId;

    #[test]
    fn not_oscillating_below_window() {
        let mut a = Agent::new(AgentId(0), "R1", (0, 0));
        a.record_position((0, 0));
        a.record_position((0, 1));
        assert!(!a.detect_oscillation(5));
    }

    #[test]
    fn detects_tight_loop() {
        let mut a = Agent::new(AgentId(0), "R1", (0, 0));
        for pos in [(0, 0), (0, 1), (0, 0), (0, 1), (0, 0)] {
            a.record_position(pos);
        }
        assert!(a.detect_oscillation(5));
    }

    #[test]
    fn history_caps_at_ten() {
        let mut a = Agent::new(AgentId(0), "R1", (0, 0));
        for i in 0..20 {
            a.record_position((0, i));
        }
        assert_eq!(a.position_history.len(), 10);
    }
}

#[cfg(test)]
mod builders {
    use crate::{AgentArenaBuilder, PackageArenaBuilder};

    #[test]
    fn builds_sequential_ids() {
        let agents = AgentArenaBuilder::new()
            .push("R1", (0, 0))
            .push("R2", (1, 1))
            .build()
            .unwrap();
        assert_eq!(agents.len(), 2);
        assert_eq!(agents.get(logix_core::AgentId(1)).name, "R2");
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = AgentArenaBuilder::new()
            .push("R1", (0, 0))
            .push("R1", (1, 1))
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn package_builder_builds() {
        let packages = PackageArenaBuilder::new()
            .push("P1", (0, 5), (5, 5))
            .build()
            .unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages.get(logix_core::PackageId(0)).pickup, (0, 5));
    }
}
