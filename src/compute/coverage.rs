//! Coverage scoring for drone placements.
//!
//! A drone at continuous position `(x, y)` sits in grid cell
//! `(floor(x / scale), floor(y / scale))` and covers every cell whose offset
//! `(dx, dy)` from it satisfies `dx^2 + dy^2 <= r^2`, where
//! `r = floor(detection_radius / scale)` is the radius in whole cells. The
//! covered set of a placement is the union over all drones, and its score is
//! the probability mass inside that set.

use serde::{Deserialize, Serialize};

use crate::schema::{Placement, ProbabilityGrid};

/// Mapping between continuous area coordinates and grid cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Grid side length in cells.
    pub grid_size: usize,
    /// Physical size of one cell.
    pub scale: f64,
    /// Detection radius in whole cells.
    pub radius_cells: i64,
}

impl GridGeometry {
    pub fn new(grid_size: usize, area_size: f64, detection_radius: f64) -> Self {
        let scale = area_size / grid_size as f64;
        let radius_cells = ((detection_radius / scale).floor() as i64).max(0);
        Self {
            grid_size,
            scale,
            radius_cells,
        }
    }

    /// Cell indices for a continuous position. May fall outside the grid.
    #[inline]
    pub fn cell_of(&self, x: f64, y: f64) -> (i64, i64) {
        ((x / self.scale).floor() as i64, (y / self.scale).floor() as i64)
    }

    /// Covered-cell mask for a placement.
    pub fn mask(&self, placement: &Placement) -> CoverageMask {
        let size = self.grid_size as i64;
        let r = self.radius_cells;
        // Visited cells are at most `r` away on each axis, so the squared
        // distance always fits in i128.
        let r_sq = i128::from(r) * i128::from(r);
        let mut covered = vec![false; self.grid_size * self.grid_size];

        for &(x, y) in placement.agents() {
            let (i, j) = self.cell_of(x, y);

            // Only visit the part of the bounding square that lies on the grid.
            let row_lo = i.saturating_sub(r).max(0);
            let row_hi = i.saturating_add(r).min(size - 1);
            let col_lo = j.saturating_sub(r).max(0);
            let col_hi = j.saturating_add(r).min(size - 1);

            for a in row_lo..=row_hi {
                let dx = i128::from(a - i);
                let dx_sq = dx * dx;
                let row = a as usize * self.grid_size;
                for b in col_lo..=col_hi {
                    let dy = i128::from(b - j);
                    if dx_sq + dy * dy <= r_sq {
                        covered[row + b as usize] = true;
                    }
                }
            }
        }

        CoverageMask {
            size: self.grid_size,
            covered,
        }
    }
}

/// Set of grid cells covered by at least one drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageMask {
    /// Grid side length in cells.
    pub size: usize,
    /// Row-major covered flags.
    pub covered: Vec<bool>,
}

impl CoverageMask {
    #[inline]
    pub fn is_covered(&self, i: usize, j: usize) -> bool {
        self.covered[i * self.size + j]
    }

    /// Number of covered cells.
    pub fn covered_cells(&self) -> usize {
        self.covered.iter().filter(|&&c| c).count()
    }

    /// Probability mass of the covered cells.
    pub fn covered_mass(&self, grid: &ProbabilityGrid) -> f64 {
        self.covered
            .iter()
            .zip(grid.values())
            .filter(|(c, _)| **c)
            .map(|(_, v)| v)
            .sum()
    }
}

/// Scores placements against a fixed probability grid.
#[derive(Debug, Clone)]
pub struct CoverageEvaluator {
    grid: ProbabilityGrid,
    geometry: GridGeometry,
}

impl CoverageEvaluator {
    /// Create an evaluator for one grid and sensor geometry.
    pub fn new(grid: ProbabilityGrid, area_size: f64, detection_radius: f64) -> Self {
        let geometry = GridGeometry::new(grid.size(), area_size, detection_radius);
        Self { grid, geometry }
    }

    pub fn grid(&self) -> &ProbabilityGrid {
        &self.grid
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Covered-cell mask for a placement.
    pub fn mask(&self, placement: &Placement) -> CoverageMask {
        self.geometry.mask(placement)
    }

    /// Probability mass covered by a placement, in `[0, 1]`.
    pub fn score(&self, placement: &Placement) -> f64 {
        self.mask(placement).covered_mass(&self.grid)
    }
}

/// One-shot coverage score without building an evaluator.
pub fn coverage_score(
    placement: &Placement,
    grid: &ProbabilityGrid,
    area_size: f64,
    detection_radius: f64,
) -> f64 {
    GridGeometry::new(grid.size(), area_size, detection_radius)
        .mask(placement)
        .covered_mass(grid)
}
