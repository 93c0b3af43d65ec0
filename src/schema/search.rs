//! Progress and result types for swarm search runs.

use serde::{Deserialize, Serialize};

use super::ScoredPlacement;

/// Progress update emitted once per iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProgress {
    /// Iterations completed so far (1-based).
    pub iteration: usize,
    /// Total iterations planned.
    pub total_iterations: usize,
    /// Best score seen by the swarm so far.
    pub best_score: f64,
    /// Best score among particles this iteration.
    pub iteration_best: f64,
    /// Mean particle score this iteration.
    pub avg_score: f64,
    /// Iterations since the global best last improved.
    pub stagnation_count: usize,
}

/// Per-iteration score history for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchHistory {
    /// Global best score after each iteration.
    pub best_score: Vec<f64>,
    /// Best particle score within each iteration.
    pub iteration_best: Vec<f64>,
    /// Mean particle score within each iteration.
    pub avg_score: Vec<f64>,
}

/// Statistics from a search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchStats {
    /// Iterations run.
    pub iterations: usize,
    /// Total coverage evaluations.
    pub total_evaluations: u64,
    /// Best score achieved.
    pub best_score: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
}

/// Final result of a search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best placement found over the whole run.
    pub best: ScoredPlacement,
    /// Statistics from the run.
    pub stats: SearchStats,
    /// Full history for analysis.
    pub history: SearchHistory,
}
