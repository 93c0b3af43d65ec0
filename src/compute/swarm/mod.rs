//! Particle swarm search for drone placements.
//!
//! Each particle is one full placement of every drone. An iteration has two
//! phases:
//!
//! - **Evaluation**: every particle is scored by the [`CoverageEvaluator`]
//!   (in parallel), its personal best is updated on strict improvement, and
//!   the swarm's global best is folded from the particle scores. Ties keep
//!   the first particle in swarm order.
//! - **Update**: every particle draws one `(r1, r2)` pair and moves with
//!   `v = w*v + c1*r1*(pbest - x) + c2*r2*(gbest - x)`, `x = clamp(x + v)`.
//!
//! The run always lasts exactly `max_iterations` iterations.
//!
//! # Example
//!
//! ```rust,no_run
//! use drone_coverage::schema::{ProbabilityGrid, SearchConfig};
//! use drone_coverage::compute::swarm::SwarmOptimizer;
//!
//! let config = SearchConfig::default();
//! let grid = ProbabilityGrid::random(config.grid.size, None).unwrap();
//!
//! let mut optimizer = SwarmOptimizer::new(config, grid).unwrap();
//! let result = optimizer.run_with_callback(|progress| {
//!     println!("Iteration {}: best = {:.4}", progress.iteration, progress.best_score);
//! });
//! println!("Covered probability: {:.4}", result.best.score);
//! ```
//!
//! [`CoverageEvaluator`]: crate::compute::CoverageEvaluator

mod optimizer;
mod particle;

pub use optimizer::{SwarmOptimizer, optimize};
pub use particle::{Particle, SwarmRng};
