//! Unit tests for logix-config.

use std::io::Cursor;

use crate::{build_world, load_world};

const WORLD: &[u8] = br#"{
    "settings": { "rows": 5, "cols": 5, "max_wait": 4, "max_steps": 500 },
    "walls": [[2, 0, 2, 3]],
    "robots": [{"name": "Scout", "pos": [0, 0]}, {"pos": [4, 4]}],
    "packages": [{"name": "P1", "pickup": [0, 4], "dropoff": [4, 0]}]
}"#;

#[cfg(test)]
mod load {
    use super::*;

    #[test]
    fn parses_settings_and_entities() {
        let config = load_world(Cursor::new(WORLD)).unwrap();
        assert_eq!(config.settings.rows, 5);
        assert_eq!(config.settings.max_wait, 4);
        assert_eq!(config.robots.len(), 2);
        assert_eq!(config.packages.len(), 1);
    }

    #[test]
    fn missing_settings_block_uses_defaults() {
        let config = load_world(Cursor::new(b"{}" as &[u8])).unwrap();
        assert_eq!(config.settings.rows, 10);
        assert_eq!(config.settings.cols, 10);
        assert_eq!(config.settings.max_wait, 6);
        assert_eq!(config.settings.max_steps, 2000);
    }

    #[test]
    fn malformed_json_is_one_error() {
        let err = load_world(Cursor::new(b"not json" as &[u8])).unwrap_err();
        assert_eq!(err.len(), 1);
    }
}

#[cfg(test)]
mod build {
    use super::*;

    #[test]
    fn builds_grid_obstacles_and_arenas() {
        let config = load_world(Cursor::new(WORLD)).unwrap();
        let world = build_world(config).unwrap();
        assert_eq!(world.dims.rows, 5);
        assert_eq!(world.dims.cols, 5);
        assert!(world.obstacles.contains(&(2, 0)));
        assert!(world.obstacles.contains(&(2, 3)));
        assert_eq!(world.agents.len(), 2);
        assert_eq!(world.packages.len(), 1);
    }

    #[test]
    fn unnamed_robot_gets_name_from_its_one_based_list_position() {
        let config = load_world(Cursor::new(WORLD)).unwrap();
        let world = build_world(config).unwrap();
        // "Scout" is explicit at index 0; the unnamed robot at index 1 gets
        // a missing id defaulted to index+1 = 2, hence "R2".
        assert_eq!(world.agents.get(logix_core::AgentId(1)).name, "R2");
        assert_eq!(world.agents.get(logix_core::AgentId(0)).name, "Scout");
    }

    #[test]
    fn explicit_id_overrides_list_position_for_default_name() {
        let json = br#"{"robots": [{"id": 7, "pos": [0, 0]}]}"#;
        let config = load_world(Cursor::new(json.as_slice())).unwrap();
        let world = build_world(config).unwrap();
        assert_eq!(world.agents.get(logix_core::AgentId(0)).name, "R7");
    }

    #[test]
    fn out_of_bounds_robot_is_fatal() {
        let json = br#"{"robots": [{"pos": [99, 99]}]}"#;
        let config = load_world(Cursor::new(json.as_slice())).unwrap();
        let errors = build_world(config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn robot_on_wall_is_fatal() {
        let json = br#"{"walls": [[0, 0, 0, 0]], "robots": [{"pos": [0, 0]}]}"#;
        let config = load_world(Cursor::new(json.as_slice())).unwrap();
        let errors = build_world(config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn malformed_wall_rect_is_fatal() {
        let json = br#"{"walls": [[0, 0, 0]]}"#;
        let config = load_world(Cursor::new(json.as_slice())).unwrap();
        let errors = build_world(config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn duplicate_robot_name_is_fatal() {
        let json = br#"{"robots": [{"name": "R1", "pos": [0, 0]}, {"name": "R1", "pos": [1, 1]}]}"#;
        let config = load_world(Cursor::new(json.as_slice())).unwrap();
        let errors = build_world(config).unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn collects_every_error_before_aborting() {
        let json = br#"{"robots": [{"pos": [99, 0]}, {"pos": [0, 99]}]}"#;
        let config = load_world(Cursor::new(json.as_slice())).unwrap();
        let errors = build_world(config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
