//! Drone Coverage - Particle swarm placement of sensing drones.
//!
//! This crate searches for placements of a fixed number of drones over a
//! square area so that their circular detection footprints cover as much of
//! a probability map as possible.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration, probability grid, placement and result types
//! - `compute`: Coverage scoring and the particle swarm optimizer
//! - `report`: Text summaries and JSON export of results
//!
//! # Example
//!
//! ```rust,no_run
//! use drone_coverage::{
//!     schema::{ProbabilityGrid, SearchConfig},
//!     compute::optimize,
//! };
//!
//! // Create configuration
//! let config = SearchConfig {
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! // Probability map over the search area
//! let grid = ProbabilityGrid::random(config.grid.size, config.grid.seed).unwrap();
//!
//! // Run the swarm
//! let best = optimize(&config, &grid).unwrap();
//!
//! println!("Covered probability: {:.4}", best.score);
//! ```

pub mod compute;
pub mod report;
pub mod schema;

// Re-export commonly used types
pub use compute::{CoverageEvaluator, SwarmOptimizer, coverage_score, optimize};
pub use schema::{ConfigError, Placement, ProbabilityGrid, ScoredPlacement, SearchConfig};
