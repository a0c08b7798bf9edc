//! Unit tests for logix-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, PackageId};

    #[test]
    fn index_roundtrip() {
        let id = AgentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(AgentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(PackageId(100) > PackageId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(AgentId::INVALID.0, u32::MAX);
        assert_eq!(PackageId::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
    }
}

#[cfg(test)]
mod time {
    use crate::Tick;

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(t.next(), Tick(11));
    }
}

#[cfg(test)]
mod grid {
    use crate::{GridDims, GridOps};

    #[test]
    fn bounds_check() {
        let dims = GridDims::new(5, 5);
        assert!(GridOps::in_bounds(dims, 0, 0));
        assert!(GridOps::in_bounds(dims, 4, 4));
        assert!(!GridOps::in_bounds(dims, 5, 0));
        assert!(!GridOps::in_bounds(dims, 0, -1));
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(GridOps::manhattan((0, 0), (3, 4)), 7);
        assert_eq!(GridOps::manhattan((2, 2), (2, 2)), 0);
    }

    #[test]
    fn direction_is_unit_step() {
        assert_eq!(GridOps::direction((0, 0), (5, 0)), (1, 0));
        assert_eq!(GridOps::direction((0, 0), (0, -5)), (0, -1));
        assert_eq!(GridOps::direction((2, 2), (2, 2)), (0, 0));
    }

    #[test]
    fn is_turn_ignores_initial_direction() {
        assert!(!GridOps::is_turn((0, 0), (1, 0)));
        assert!(!GridOps::is_turn((1, 0), (1, 0)));
        assert!(GridOps::is_turn((1, 0), (0, 1)));
    }

    #[test]
    fn wall_rect_normalizes_corners() {
        let cells = GridOps::expand_wall_rect(3, 1, 1, 1);
        assert_eq!(cells.len(), 3);
        assert!(cells.contains(&(1, 1)));
        assert!(cells.contains(&(2, 1)));
        assert!(cells.contains(&(3, 1)));
    }
}
