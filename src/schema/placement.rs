//! Candidate drone placements.

use serde::{Deserialize, Serialize};

/// Positions of every drone in one candidate configuration.
///
/// The order of agents carries no meaning for coverage, but it is fixed for
/// the lifetime of a particle so that velocity components stay paired with
/// the same coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Placement {
    agents: Vec<(f64, f64)>,
}

impl Placement {
    pub fn new(agents: Vec<(f64, f64)>) -> Self {
        Self { agents }
    }

    /// Number of agents.
    #[inline]
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Agent positions in order.
    #[inline]
    pub fn agents(&self) -> &[(f64, f64)] {
        &self.agents
    }

    #[inline]
    pub fn agents_mut(&mut self) -> &mut [(f64, f64)] {
        &mut self.agents
    }

    /// Append another agent.
    pub fn push(&mut self, position: (f64, f64)) {
        self.agents.push(position);
    }

    /// Clamp every coordinate into `[0, area_size]`. NaN coordinates land
    /// on `0`.
    pub fn clamp_to(&mut self, area_size: f64) {
        for (x, y) in self.agents.iter_mut() {
            *x = clamp_coordinate(*x, area_size);
            *y = clamp_coordinate(*y, area_size);
        }
    }

    /// True when every coordinate lies in `[0, area_size]`.
    pub fn within(&self, area_size: f64) -> bool {
        self.agents
            .iter()
            .all(|&(x, y)| (0.0..=area_size).contains(&x) && (0.0..=area_size).contains(&y))
    }
}

#[inline]
fn clamp_coordinate(value: f64, area_size: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, area_size)
    }
}

impl From<Vec<(f64, f64)>> for Placement {
    fn from(agents: Vec<(f64, f64)>) -> Self {
        Self::new(agents)
    }
}

/// A placement together with its coverage score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlacement {
    /// Drone positions.
    pub placement: Placement,
    /// Probability mass covered, in `[0, 1]`.
    pub score: f64,
}
