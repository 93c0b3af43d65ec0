//! Configuration types for drone coverage search parameters.

use serde::{Deserialize, Serialize};

use super::ProbabilityGrid;

/// Tolerance used when checking that a probability grid sums to one.
pub const GRID_SUM_TOLERANCE: f64 = 1e-6;

/// Top-level search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of drones placed simultaneously.
    pub num_agents: usize,
    /// Side length of the square search area (same units as positions).
    pub area_size: f64,
    /// Detection radius of every drone (same units as positions).
    pub detection_radius: f64,
    /// Particle swarm parameters.
    #[serde(default)]
    pub swarm: SwarmConfig,
    /// Probability map generation parameters.
    #[serde(default)]
    pub grid: GridConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_agents: 10,
            area_size: 5000.0,
            detection_radius: 200.0,
            swarm: SwarmConfig::default(),
            grid: GridConfig::default(),
            random_seed: None,
        }
    }
}

/// Particle swarm optimizer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmConfig {
    /// Number of particles (candidate placements) in the swarm.
    #[serde(default = "default_num_particles")]
    pub num_particles: usize,
    /// Fixed number of iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Weight of the previous velocity.
    #[serde(default = "default_inertia_weight")]
    pub inertia_weight: f64,
    /// Pull toward the particle's own best placement.
    #[serde(default = "default_cognitive_weight")]
    pub cognitive_weight: f64,
    /// Pull toward the swarm's best placement.
    #[serde(default = "default_social_weight")]
    pub social_weight: f64,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            num_particles: default_num_particles(),
            max_iterations: default_max_iterations(),
            inertia_weight: default_inertia_weight(),
            cognitive_weight: default_cognitive_weight(),
            social_weight: default_social_weight(),
        }
    }
}

fn default_num_particles() -> usize {
    30
}
fn default_max_iterations() -> usize {
    100
}
fn default_inertia_weight() -> f64 {
    0.5
}
fn default_cognitive_weight() -> f64 {
    1.5
}
fn default_social_weight() -> f64 {
    1.5
}

/// Parameters for the random probability map provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid side length in cells.
    #[serde(default = "default_grid_size")]
    pub size: usize,
    /// Seed for the map generator (None = entropy).
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: default_grid_size(),
            seed: None,
        }
    }
}

fn default_grid_size() -> usize {
    50
}

impl GridConfig {
    /// Generate the random probability map these parameters describe.
    pub fn generate(&self) -> Result<ProbabilityGrid, ConfigError> {
        ProbabilityGrid::random(self.size, self.seed)
    }
}

impl SearchConfig {
    /// Validate geometry, swarm sizing and weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.area_size.is_finite() || self.area_size <= 0.0 {
            return Err(ConfigError::InvalidAreaSize(self.area_size));
        }
        if !self.detection_radius.is_finite() || self.detection_radius < 0.0 {
            return Err(ConfigError::InvalidDetectionRadius(self.detection_radius));
        }
        if self.num_agents == 0 {
            return Err(ConfigError::NoAgents);
        }
        if self.swarm.num_particles == 0 {
            return Err(ConfigError::NoParticles);
        }
        if self.swarm.max_iterations == 0 {
            return Err(ConfigError::NoIterations);
        }

        let weights = [
            ("inertia", self.swarm.inertia_weight),
            ("cognitive", self.swarm.cognitive_weight),
            ("social", self.swarm.social_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }

    /// Validate this configuration together with the grid it will run on.
    pub fn validate_with_grid(&self, grid: &ProbabilityGrid) -> Result<(), ConfigError> {
        self.validate()?;
        grid.validate()
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid side length must be non-zero")]
    EmptyGrid,
    #[error("Grid of side {size} needs {expected} values, got {actual}")]
    NotSquare {
        size: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Grid cell ({row}, {col}) holds invalid probability {value}")]
    InvalidCell { row: usize, col: usize, value: f64 },
    #[error("Grid values sum to {0}, expected 1.0")]
    NotNormalized(f64),
    #[error("Area size must be positive, got {0}")]
    InvalidAreaSize(f64),
    #[error("Detection radius must be non-negative, got {0}")]
    InvalidDetectionRadius(f64),
    #[error("Number of agents must be non-zero")]
    NoAgents,
    #[error("Number of particles must be non-zero")]
    NoParticles,
    #[error("Number of iterations must be non-zero")]
    NoIterations,
    #[error("Invalid {name} weight: {value}")]
    InvalidWeight { name: &'static str, value: f64 },
}
