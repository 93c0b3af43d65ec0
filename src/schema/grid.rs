//! Probability map over the discretized search area.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::{ConfigError, GRID_SUM_TOLERANCE};

/// Square grid of non-negative probabilities summing to one.
///
/// Values are stored row-major. Row index `i` follows the x axis of the
/// search area and column index `j` follows the y axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridData")]
pub struct ProbabilityGrid {
    size: usize,
    values: Vec<f64>,
}

/// Unvalidated wire form of a grid.
#[derive(Debug, Clone, Deserialize)]
struct GridData {
    size: usize,
    values: Vec<f64>,
}

impl TryFrom<GridData> for ProbabilityGrid {
    type Error = ConfigError;

    fn try_from(data: GridData) -> Result<Self, Self::Error> {
        Self::new(data.size, data.values)
    }
}

impl ProbabilityGrid {
    /// Build a grid from row-major values, validating shape and normalization.
    pub fn new(size: usize, values: Vec<f64>) -> Result<Self, ConfigError> {
        let grid = Self { size, values };
        grid.validate()?;
        Ok(grid)
    }

    /// Build a grid from nested rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, ConfigError> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            let actual = rows.iter().map(Vec::len).sum();
            return Err(ConfigError::NotSquare {
                size,
                expected: size * size,
                actual,
            });
        }
        Self::new(size, rows.into_iter().flatten().collect())
    }

    /// Grid with the same probability in every cell.
    pub fn uniform(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let cells = size * size;
        Self::new(size, vec![1.0 / cells as f64; cells])
    }

    /// Random normalized map: uniform draws in `[0, 1)` divided by their sum.
    pub fn random(size: usize, seed: Option<u64>) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut values: Vec<f64> = (0..size * size).map(|_| rng.r#gen::<f64>()).collect();
        let total: f64 = values.iter().sum();
        if total > 0.0 {
            for v in values.iter_mut() {
                *v /= total;
            }
        }

        Self::new(size, values)
    }

    /// Parse and validate a grid from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check shape, cell values and normalization.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        let expected = self.size * self.size;
        if self.values.len() != expected {
            return Err(ConfigError::NotSquare {
                size: self.size,
                expected,
                actual: self.values.len(),
            });
        }
        if let Some(idx) = self
            .values
            .iter()
            .position(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ConfigError::InvalidCell {
                row: idx / self.size,
                col: idx % self.size,
                value: self.values[idx],
            });
        }

        let total = self.total_mass();
        if (total - 1.0).abs() > GRID_SUM_TOLERANCE {
            return Err(ConfigError::NotNormalized(total));
        }
        Ok(())
    }

    /// Side length in cells.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Probability at row `i`, column `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    /// Row-major cell values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sum of all cells.
    pub fn total_mass(&self) -> f64 {
        self.values.iter().sum()
    }

    /// Largest single-cell probability.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Row and column of the largest cell (first one on ties).
    pub fn argmax(&self) -> (usize, usize) {
        let mut best = 0;
        for (idx, &v) in self.values.iter().enumerate() {
            if v > self.values[best] {
                best = idx;
            }
        }
        (best / self.size, best % self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_grid_normalized() {
        let grid = ProbabilityGrid::random(50, Some(7)).unwrap();
        assert_eq!(grid.size(), 50);
        assert_eq!(grid.values().len(), 2500);
        assert!((grid.total_mass() - 1.0).abs() < 1e-9);
        assert!(grid.values().iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_random_grid_seeded() {
        let a = ProbabilityGrid::random(8, Some(42)).unwrap();
        let b = ProbabilityGrid::random(8, Some(42)).unwrap();
        let c = ProbabilityGrid::random(8, Some(43)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_uniform_grid() {
        let grid = ProbabilityGrid::uniform(10).unwrap();
        assert!((grid.get(3, 4) - 0.01).abs() < 1e-12);
        assert!((grid.max_value() - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_non_square() {
        let err = ProbabilityGrid::new(3, vec![0.125; 8]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NotSquare {
                size: 3,
                expected: 9,
                actual: 8
            }
        );

        let rows = vec![vec![0.5, 0.5], vec![0.0]];
        assert!(matches!(
            ProbabilityGrid::from_rows(rows),
            Err(ConfigError::NotSquare { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_and_unnormalized() {
        assert_eq!(ProbabilityGrid::new(0, vec![]), Err(ConfigError::EmptyGrid));
        assert_eq!(ProbabilityGrid::uniform(0), Err(ConfigError::EmptyGrid));
        assert!(matches!(
            ProbabilityGrid::new(2, vec![0.5; 4]),
            Err(ConfigError::NotNormalized(_))
        ));
    }

    #[test]
    fn test_rejects_negative_cell() {
        let err = ProbabilityGrid::new(2, vec![0.5, 0.5, 0.5, -0.5]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidCell {
                row: 1,
                col: 1,
                value: -0.5
            }
        );
    }

    #[test]
    fn test_argmax() {
        let grid =
            ProbabilityGrid::from_rows(vec![vec![0.1, 0.2], vec![0.6, 0.1]]).unwrap();
        assert_eq!(grid.argmax(), (1, 0));
        assert_eq!(grid.max_value(), 0.6);
    }

    #[test]
    fn test_json_validates() {
        let grid = ProbabilityGrid::from_rows(vec![vec![0.25, 0.25], vec![0.25, 0.25]]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let parsed = ProbabilityGrid::from_json(&json).unwrap();
        assert_eq!(parsed, grid);

        let bad = r#"{ "size": 2, "values": [0.9, 0.9, 0.9, 0.9] }"#;
        assert!(ProbabilityGrid::from_json(bad).is_err());
    }
}
