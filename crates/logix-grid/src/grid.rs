//! The static grid: dimensions, obstacles, and a per-cell corridor score
//! used as a cost-shaping signal by the pathfinder.

use std::collections::HashSet;

use logix_core::{Cell, GridDims, GridOps};

/// The 8 Moore-neighborhood offsets used to score how "open" a cell's
/// surroundings are — the wider the opening, the higher the score, the more
/// attractive the cell is as a thoroughfare.
const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Clone, Debug)]
pub struct Grid {
    pub dims: GridDims,
    obstacles: HashSet<Cell>,
    corridor_score: Vec<i32>,
}

impl Grid {
    pub fn new(dims: GridDims, obstacles: HashSet<Cell>) -> Self {
        let mut corridor_score = vec![0i32; dims.cell_count()];
        for r in 0..dims.rows {
            for c in 0..dims.cols {
                let pos = (r, c);
                let idx = (r * dims.cols + c) as usize;
                if obstacles.contains(&pos) {
                    continue;
                }
                let mut open = 0;
                for (dr, dc) in MOORE_OFFSETS {
                    let n = (r + dr, c + dc);
                    if GridOps::in_bounds(dims, n.0, n.1) && !obstacles.contains(&n) {
                        open += 1;
                    }
                }
                corridor_score[idx] = open;
            }
        }
        Self {
            dims,
            obstacles,
            corridor_score,
        }
    }

    #[inline]
    pub fn in_bounds(&self, pos: Cell) -> bool {
        GridOps::in_bounds(self.dims, pos.0, pos.1)
    }

    #[inline]
    pub fn is_obstacle(&self, pos: Cell) -> bool {
        self.obstacles.contains(&pos)
    }

    pub fn obstacles(&self) -> &HashSet<Cell> {
        &self.obstacles
    }

    /// How open this cell's immediate surroundings are, `0..=8`. Obstacle
    /// cells always score 0.
    #[inline]
    pub fn corridor_score(&self, pos: Cell) -> i32 {
        if !self.in_bounds(pos) {
            return 0;
        }
        let idx = (pos.0 * self.dims.cols + pos.1) as usize;
        self.corridor_score[idx]
    }

    pub fn is_narrow_passage(&self, pos: Cell) -> bool {
        let (r, c) = pos;
        let mut open_count = 0;
        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let n = (r + dr, c + dc);
            if self.in_bounds(n) && !self.is_obstacle(n) {
                open_count += 1;
            }
        }
        open_count <= 2
    }

    pub fn all_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.dims.cols;
        (0..self.dims.rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
    }
}
