//! Compute module - Coverage scoring and swarm search.

mod coverage;

pub mod swarm;

pub use coverage::*;
pub use swarm::{SwarmOptimizer, optimize};
