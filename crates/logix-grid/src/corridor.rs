//! Corridor/highway analysis: which cells form the grid's main thoroughfares,
//! how strongly the pathfinder should prefer them, and which direction
//! traffic tends to flow in.
//!
//! This is data, not a second pathfinding algorithm — a legacy, divergent A*
//! variant that also consumed this same data was not carried over; the
//! time-space pathfinder is the only search that runs over it.

use std::collections::{HashMap, HashSet};

use logix_core::Cell;

use crate::Grid;

/// A cell counts toward a main corridor once its corridor score reaches this.
const MAIN_CORRIDOR_SCORE: i32 = 6;
/// A run of open cells along a row/column counts as a corridor lane once
/// every cell in the run scores at least this.
const LANE_MIN_SCORE: i32 = 4;
const MIN_HORIZONTAL_RUN: usize = 10;
const MIN_VERTICAL_RUN: usize = 5;
/// Cells within this many rows/cols of the grid edge get a small highway bonus.
const EDGE_BONUS_DIST: i32 = 3;

#[derive(Clone, Debug, Default)]
pub struct CorridorMap {
    main_corridors: HashSet<Cell>,
    highway_map: HashMap<Cell, f64>,
    flow_direction: Option<(i32, i32)>,
}

impl CorridorMap {
    /// Build the corridor map from the grid's obstacle layout and the
    /// pickup/dropoff cells of all known packages (used to derive the
    /// dominant traffic flow direction).
    pub fn build(grid: &Grid, pickups: &[Cell], dropoffs: &[Cell]) -> Self {
        let mut main_corridors = HashSet::new();

        for pos in grid.all_cells() {
            if grid.corridor_score(pos) >= MAIN_CORRIDOR_SCORE {
                main_corridors.insert(pos);
            }
        }
        Self::detect_horizontal_lanes(grid, &mut main_corridors);
        Self::detect_vertical_lanes(grid, &mut main_corridors);

        let highway_map = Self::build_highway_map(grid, &main_corridors);
        let flow_direction = Self::flow_direction(pickups, dropoffs);

        Self {
            main_corridors,
            highway_map,
            flow_direction,
        }
    }

    fn detect_horizontal_lanes(grid: &Grid, main_corridors: &mut HashSet<Cell>) {
        for r in 0..grid.dims.rows {
            let mut consecutive = 0usize;
            let mut start_col = 0;
            for c in 0..=grid.dims.cols {
                let in_run = c < grid.dims.cols && {
                    let pos = (r, c);
                    !grid.is_obstacle(pos) && grid.corridor_score(pos) >= LANE_MIN_SCORE
                };
                if in_run {
                    if consecutive == 0 {
                        start_col = c;
                    }
                    consecutive += 1;
                } else {
                    if consecutive >= MIN_HORIZONTAL_RUN {
                        for col in start_col..start_col + consecutive as i32 {
                            main_corridors.insert((r, col));
                        }
                    }
                    consecutive = 0;
                }
            }
        }
    }

    fn detect_vertical_lanes(grid: &Grid, main_corridors: &mut HashSet<Cell>) {
        for c in 0..grid.dims.cols {
            let mut consecutive = 0usize;
            let mut start_row = 0;
            for r in 0..=grid.dims.rows {
                let in_run = r < grid.dims.rows && {
                    let pos = (r, c);
                    !grid.is_obstacle(pos) && grid.corridor_score(pos) >= LANE_MIN_SCORE
                };
                if in_run {
                    if consecutive == 0 {
                        start_row = r;
                    }
                    consecutive += 1;
                } else {
                    if consecutive >= MIN_VERTICAL_RUN {
                        for row in start_row..start_row + consecutive as i32 {
                            main_corridors.insert((row, c));
                        }
                    }
                    consecutive = 0;
                }
            }
        }
    }

    fn build_highway_map(grid: &Grid, main_corridors: &HashSet<Cell>) -> HashMap<Cell, f64> {
        let mut map = HashMap::with_capacity(grid.dims.cell_count());
        for pos in grid.all_cells() {
            if grid.is_obstacle(pos) {
                map.insert(pos, 0.0);
                continue;
            }
            let mut score = 0.0;
            if main_corridors.contains(&pos) {
                score += 3.0;
            }
            score += grid.corridor_score(pos) as f64 * 0.3;

            let edge_dist = pos
                .0
                .min(pos.1)
                .min(grid.dims.rows - 1 - pos.0)
                .min(grid.dims.cols - 1 - pos.1);
            if edge_dist <= EDGE_BONUS_DIST {
                score += 1.0;
            }
            map.insert(pos, score);
        }
        map
    }

    fn flow_direction(pickups: &[Cell], dropoffs: &[Cell]) -> Option<(i32, i32)> {
        if pickups.is_empty() || dropoffs.is_empty() {
            return None;
        }
        let center = |cells: &[Cell]| -> Cell {
            let n = cells.len() as i32;
            let sum_r: i32 = cells.iter().map(|c| c.0).sum();
            let sum_c: i32 = cells.iter().map(|c| c.1).sum();
            (sum_r / n, sum_c / n)
        };
        let pickup_center = center(pickups);
        let dropoff_center = center(dropoffs);
        let dr = (dropoff_center.0 - pickup_center.0).signum();
        let dc = (dropoff_center.1 - pickup_center.1).signum();
        Some((dr, dc))
    }

    pub fn highway_bonus(&self, pos: Cell) -> f64 {
        self.highway_map.get(&pos).copied().unwrap_or(0.0)
    }

    pub fn is_on_main_corridor(&self, pos: Cell) -> bool {
        self.main_corridors.contains(&pos)
    }

    /// The direction traffic should prefer given the current task state:
    /// towards the dropoff zone when heading to a dropoff, away from it
    /// (back towards the pickup zone) otherwise.
    pub fn preferred_direction(&self, heading_to_dropoff: bool) -> (i32, i32) {
        match self.flow_direction {
            None => (0, 0),
            Some((dr, dc)) => {
                if heading_to_dropoff {
                    (dr, dc)
                } else {
                    (-dr, -dc)
                }
            }
        }
    }
}
