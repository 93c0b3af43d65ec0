//! Result reporting: text summaries and JSON export for external plotting.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compute::{CoverageEvaluator, CoverageMask, GridGeometry};
use crate::schema::{
    ConfigError, ProbabilityGrid, ScoredPlacement, SearchConfig, SearchHistory, SearchResult,
    SearchStats,
};

/// Errors while saving or loading results.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid export: {0}")]
    Config(#[from] ConfigError),
    #[error("Coverage mask is {mask}x{mask} with {cells} cells but the grid is {grid}x{grid}")]
    MaskMismatch {
        grid: usize,
        mask: usize,
        cells: usize,
    },
}

/// Everything a renderer needs to draw a search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultExport {
    /// Configuration of the run.
    pub config: SearchConfig,
    /// Best placement and its score.
    pub best: ScoredPlacement,
    /// Run statistics.
    pub stats: SearchStats,
    /// Score history per iteration.
    pub history: SearchHistory,
    /// Probability map the run optimized over.
    pub grid: ProbabilityGrid,
    /// Cells covered by the best placement.
    pub coverage: CoverageMask,
}

impl ResultExport {
    pub fn new(config: &SearchConfig, result: &SearchResult, evaluator: &CoverageEvaluator) -> Self {
        Self {
            config: config.clone(),
            best: result.best.clone(),
            stats: result.stats.clone(),
            history: result.history.clone(),
            grid: evaluator.grid().clone(),
            coverage: evaluator.mask(&result.best.placement),
        }
    }

    /// Check the export is self-consistent before handing it to a renderer.
    pub fn validate(&self) -> Result<(), ReportError> {
        self.config.validate_with_grid(&self.grid)?;
        if self.coverage.size != self.grid.size()
            || self.coverage.covered.len() != self.grid.values().len()
        {
            return Err(ReportError::MaskMismatch {
                grid: self.grid.size(),
                mask: self.coverage.size,
                cells: self.coverage.covered.len(),
            });
        }
        Ok(())
    }
}

/// Write an export as pretty JSON.
pub fn save_json<P: AsRef<Path>>(path: P, export: &ResultExport) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(export)?;
    fs::write(path, json)?;
    Ok(())
}

/// Read and validate an export.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<ResultExport, ReportError> {
    let content = fs::read_to_string(path)?;
    let export: ResultExport = serde_json::from_str(&content)?;
    export.validate()?;
    Ok(export)
}

/// Human-readable report of the best placement.
pub fn summary(result: &SearchResult, geometry: &GridGeometry) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Best drone positions:");
    for (n, &(x, y)) in result.best.placement.agents().iter().enumerate() {
        let (i, j) = geometry.cell_of(x, y);
        let _ = writeln!(
            out,
            "  Drone {:>3}: ({:>10.2}, {:>10.2})  cell ({}, {})",
            n + 1,
            x,
            y,
            i,
            j
        );
    }
    let _ = writeln!(
        out,
        "Total probability covered: {:.6} ({:.2}%)",
        result.best.score,
        result.best.score * 100.0
    );
    let _ = writeln!(
        out,
        "Iterations: {}, evaluations: {}, time: {:.2}s ({:.0} evals/s)",
        result.stats.iterations,
        result.stats.total_evaluations,
        result.stats.elapsed_seconds,
        result.stats.evaluations_per_second
    );
    out
}
