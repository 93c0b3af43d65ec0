//! Particle swarm optimizer over drone placements.

use rayon::prelude::*;

use crate::compute::CoverageEvaluator;
use crate::schema::{
    ConfigError, Placement, ProbabilityGrid, ScoredPlacement, SearchConfig, SearchHistory,
    SearchProgress, SearchResult, SearchStats,
};

use super::particle::{Particle, SwarmRng};

/// Search engine that runs the swarm for a fixed number of iterations.
pub struct SwarmOptimizer {
    config: SearchConfig,
    evaluator: CoverageEvaluator,
    rng: SwarmRng,
    particles: Vec<Particle>,
    global_best: Option<ScoredPlacement>,
    history: SearchHistory,
    iteration: usize,
    stagnation_count: usize,
}

impl SwarmOptimizer {
    /// Create a new optimizer after validating the configuration and grid.
    pub fn new(config: SearchConfig, grid: ProbabilityGrid) -> Result<Self, ConfigError> {
        config.validate_with_grid(&grid)?;

        let rng = match config.random_seed {
            Some(seed) => SwarmRng::new(seed),
            None => SwarmRng::random(),
        };
        let evaluator = CoverageEvaluator::new(grid, config.area_size, config.detection_radius);

        Ok(Self {
            config,
            evaluator,
            rng,
            particles: Vec::new(),
            global_best: None,
            history: SearchHistory::default(),
            iteration: 0,
            stagnation_count: 0,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &CoverageEvaluator {
        &self.evaluator
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Best placement seen so far, if any particle has been evaluated.
    pub fn global_best(&self) -> Option<&ScoredPlacement> {
        self.global_best.as_ref()
    }

    /// Iterations completed since the last initialization.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Create the swarm: uniform positions, normal velocities, no bests.
    pub fn initialize(&mut self) {
        let num_agents = self.config.num_agents;
        let area_size = self.config.area_size;

        self.particles.clear();
        for _ in 0..self.config.swarm.num_particles {
            let position = self.rng.random_placement(num_agents, area_size);
            let velocity = self.rng.random_velocity(num_agents);
            self.particles.push(Particle::new(position, velocity));
        }

        self.global_best = None;
        self.history = SearchHistory::default();
        self.iteration = 0;
        self.stagnation_count = 0;
    }

    /// Score every particle and fold the scores into the global best.
    fn evaluate_swarm(&mut self) {
        let evaluator = &self.evaluator;

        self.particles.par_iter_mut().for_each(|particle| {
            let score = evaluator.score(&particle.position);
            particle.record(score);
        });

        // First particle with the highest score wins ties.
        let iteration_best = self
            .particles
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (idx, p)| match best {
                Some((_, score)) if p.score <= score => best,
                _ => Some((idx, p.score)),
            });

        let improved = match (iteration_best, &self.global_best) {
            (Some((_, score)), Some(global)) => score > global.score,
            (Some(_), None) => true,
            (None, _) => false,
        };

        if improved && let Some((idx, score)) = iteration_best {
            self.global_best = Some(ScoredPlacement {
                placement: self.particles[idx].position.clone(),
                score,
            });
            self.stagnation_count = 0;
        } else {
            self.stagnation_count += 1;
        }

        let count = self.particles.len().max(1) as f64;
        let avg_score = self.particles.iter().map(|p| p.score).sum::<f64>() / count;
        let best_score = self.global_best.as_ref().map_or(0.0, |b| b.score);

        self.history.best_score.push(best_score);
        self.history
            .iteration_best
            .push(iteration_best.map_or(0.0, |(_, s)| s));
        self.history.avg_score.push(avg_score);
    }

    /// Move every particle toward its own best and the global best.
    fn update_swarm(&mut self) {
        let Some(target) = self.global_best.as_ref().map(|b| b.placement.clone()) else {
            return;
        };

        // Coefficients are drawn in swarm order so seeded runs do not depend
        // on thread scheduling.
        let coefficients: Vec<(f64, f64)> = (0..self.particles.len())
            .map(|_| self.rng.coefficients())
            .collect();

        let weights = &self.config.swarm;
        let area_size = self.config.area_size;

        self.particles
            .par_iter_mut()
            .zip(coefficients.par_iter())
            .for_each(|(particle, &pair)| {
                particle.step(&target, pair, weights, area_size);
            });
    }

    /// Run one iteration: evaluation phase, then update phase.
    pub fn step(&mut self) -> SearchProgress {
        self.evaluate_swarm();
        self.update_swarm();
        self.iteration += 1;

        let progress = self.progress();
        log::debug!(
            "iteration {}/{}: best={:.6} iteration_best={:.6} avg={:.6}",
            progress.iteration,
            progress.total_iterations,
            progress.best_score,
            progress.iteration_best,
            progress.avg_score
        );
        progress
    }

    /// Get current progress.
    pub fn progress(&self) -> SearchProgress {
        SearchProgress {
            iteration: self.iteration,
            total_iterations: self.config.swarm.max_iterations,
            best_score: self.global_best.as_ref().map_or(0.0, |b| b.score),
            iteration_best: self.history.iteration_best.last().copied().unwrap_or(0.0),
            avg_score: self.history.avg_score.last().copied().unwrap_or(0.0),
            stagnation_count: self.stagnation_count,
        }
    }

    /// Run the full search with a progress callback.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> SearchResult
    where
        F: FnMut(&SearchProgress),
    {
        let start_time = std::time::Instant::now();
        let max_iterations = self.config.swarm.max_iterations;

        log::info!(
            "starting swarm search: {} agents, {} particles, {} iterations, grid {}x{}",
            self.config.num_agents,
            self.config.swarm.num_particles,
            max_iterations,
            self.evaluator.grid().size(),
            self.evaluator.grid().size()
        );

        self.initialize();
        for _ in 0..max_iterations {
            let progress = self.step();
            callback(&progress);
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let total_evaluations = (self.iteration * self.particles.len()) as u64;

        // Validation guarantees at least one evaluated particle.
        let best = self.global_best.clone().unwrap_or_else(|| ScoredPlacement {
            placement: Placement::default(),
            score: 0.0,
        });

        log::info!(
            "swarm search finished: best score {:.6} after {} evaluations in {:.3}s",
            best.score,
            total_evaluations,
            elapsed
        );

        SearchResult {
            stats: SearchStats {
                iterations: self.iteration,
                total_evaluations,
                best_score: best.score,
                elapsed_seconds: elapsed,
                evaluations_per_second: if elapsed > 0.0 {
                    total_evaluations as f64 / elapsed
                } else {
                    0.0
                },
            },
            best,
            history: self.history.clone(),
        }
    }

    /// Run the full search (blocking).
    pub fn run(&mut self) -> SearchResult {
        self.run_with_callback(|_| {})
    }
}

/// Search for the best placement of `config.num_agents` drones over `grid`.
pub fn optimize(
    config: &SearchConfig,
    grid: &ProbabilityGrid,
) -> Result<ScoredPlacement, ConfigError> {
    let mut optimizer = SwarmOptimizer::new(config.clone(), grid.clone())?;
    Ok(optimizer.run().best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::GridGeometry;
    use crate::schema::{GridConfig, SwarmConfig};

    fn small_config(num_particles: usize, max_iterations: usize) -> SearchConfig {
        SearchConfig {
            num_agents: 1,
            area_size: 1000.0,
            detection_radius: 500.0,
            swarm: SwarmConfig {
                num_particles,
                max_iterations,
                ..Default::default()
            },
            random_seed: Some(1234),
            ..Default::default()
        }
    }

    #[test]
    fn test_optimizer_creation() {
        let config = small_config(10, 5);
        let grid = ProbabilityGrid::uniform(10).unwrap();

        let mut optimizer = SwarmOptimizer::new(config, grid).unwrap();
        optimizer.initialize();

        assert_eq!(optimizer.particles().len(), 10);
        assert!(optimizer.global_best().is_none());
        assert!(
            optimizer
                .particles()
                .iter()
                .all(|p| p.best_score.is_none() && p.position == p.best_position)
        );
    }

    #[test]
    fn test_no_agents_is_config_error() {
        let config = SearchConfig {
            num_agents: 0,
            ..small_config(5, 10)
        };
        let grid = ProbabilityGrid::uniform(10).unwrap();

        assert_eq!(optimize(&config, &grid), Err(ConfigError::NoAgents));
        assert!(matches!(
            SwarmOptimizer::new(config, grid),
            Err(ConfigError::NoAgents)
        ));
    }

    #[test]
    fn test_supplied_grid_ignores_generator_size() {
        let config = SearchConfig {
            grid: GridConfig { size: 0, seed: None },
            ..small_config(5, 5)
        };
        let grid = ProbabilityGrid::uniform(10).unwrap();

        let best = optimize(&config, &grid).unwrap();
        assert!(best.score > 0.0);
    }

    #[test]
    fn test_radius_covering_grid_reaches_full_score() {
        let config = SearchConfig {
            detection_radius: 1500.0,
            ..small_config(5, 10)
        };
        let grid = ProbabilityGrid::uniform(10).unwrap();

        let best = optimize(&config, &grid).unwrap();
        assert!((best.score - 1.0).abs() < 1e-9);
        assert_eq!(best.placement.len(), 1);
    }

    #[test]
    fn test_half_area_radius_bounded_by_best_cell() {
        let config = small_config(5, 10);
        let grid = ProbabilityGrid::uniform(10).unwrap();

        // The score only depends on the agent's cell, so the optimum is the
        // best of the 11 x 11 reachable cells (index 10 is x == area_size).
        let geometry = GridGeometry::new(10, 1000.0, 500.0);
        let optimum = (0..=10)
            .flat_map(|i| (0..=10).map(move |j| (i, j)))
            .map(|(i, j)| {
                let p = Placement::new(vec![(i as f64 * 100.0, j as f64 * 100.0)]);
                geometry.mask(&p).covered_mass(&grid)
            })
            .fold(0.0, f64::max);

        assert!((optimum - 0.79).abs() < 1e-9);

        let best = optimize(&config, &grid).unwrap();
        assert!(best.score <= optimum + 1e-12);

        // A larger seeded swarm settles on a centre cell or one next to it.
        let config = small_config(30, 50);
        let best = optimize(&config, &grid).unwrap();
        assert!(best.score <= optimum + 1e-12);
        assert!(best.score >= 0.72 - 1e-12);
    }

    #[test]
    fn test_radius_zero_finds_best_cell() {
        let grid = ProbabilityGrid::from_rows(vec![vec![0.1, 0.2], vec![0.6, 0.1]]).unwrap();
        let config = SearchConfig {
            num_agents: 1,
            area_size: 2.0,
            detection_radius: 0.0,
            swarm: SwarmConfig {
                num_particles: 30,
                max_iterations: 20,
                ..Default::default()
            },
            random_seed: Some(99),
            ..Default::default()
        };

        let best = optimize(&config, &grid).unwrap();
        assert!((best.score - grid.max_value()).abs() < 1e-12);

        let (x, y) = best.placement.agents()[0];
        assert_eq!(((x as usize).min(1), (y as usize).min(1)), grid.argmax());
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let grid = ProbabilityGrid::random(20, Some(5)).unwrap();
        let config = SearchConfig {
            num_agents: 4,
            area_size: 2000.0,
            detection_radius: 150.0,
            swarm: SwarmConfig {
                num_particles: 12,
                max_iterations: 15,
                ..Default::default()
            },
            random_seed: Some(42),
            ..Default::default()
        };

        let a = optimize(&config, &grid).unwrap();
        let b = optimize(&config, &grid).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_seeded_runs_ignore_thread_count() {
        let grid = ProbabilityGrid::random(20, Some(5)).unwrap();
        let config = SearchConfig {
            num_agents: 3,
            area_size: 2000.0,
            detection_radius: 200.0,
            swarm: SwarmConfig {
                num_particles: 16,
                max_iterations: 12,
                ..Default::default()
            },
            random_seed: Some(21),
            ..Default::default()
        };

        let run_with_threads = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| optimize(&config, &grid).unwrap())
        };

        let single = run_with_threads(1);
        assert_eq!(single, run_with_threads(4));
        assert_eq!(single, run_with_threads(7));
    }

    #[test]
    fn test_history_is_monotone_and_positions_clamped() {
        let grid = ProbabilityGrid::random(25, Some(8)).unwrap();
        let config = SearchConfig {
            num_agents: 5,
            area_size: 2500.0,
            detection_radius: 250.0,
            swarm: SwarmConfig {
                num_particles: 15,
                max_iterations: 25,
                ..Default::default()
            },
            random_seed: Some(7),
            ..Default::default()
        };

        let mut optimizer = SwarmOptimizer::new(config, grid).unwrap();
        optimizer.initialize();

        let mut previous = f64::NEG_INFINITY;
        for _ in 0..25 {
            let progress = optimizer.step();
            assert!(progress.best_score >= previous);
            assert!(progress.iteration_best <= progress.best_score);
            previous = progress.best_score;

            for particle in optimizer.particles() {
                assert!(particle.position.within(2500.0));
                let best = particle.best_score.unwrap();
                assert!(best >= particle.score);
                assert!(best <= progress.best_score);
            }
        }
        assert_eq!(optimizer.iteration(), 25);
    }

    #[test]
    fn test_global_best_matches_evaluator() {
        let grid = ProbabilityGrid::random(16, Some(21)).unwrap();
        let config = SearchConfig {
            num_agents: 3,
            area_size: 1600.0,
            detection_radius: 200.0,
            swarm: SwarmConfig {
                num_particles: 8,
                max_iterations: 12,
                ..Default::default()
            },
            random_seed: Some(3),
            ..Default::default()
        };

        let mut optimizer = SwarmOptimizer::new(config, grid).unwrap();
        let result = optimizer.run();

        let rescored = optimizer.evaluator().score(&result.best.placement);
        assert_eq!(rescored, result.best.score);
        assert_eq!(result.stats.best_score, result.best.score);
        assert_eq!(result.history.best_score.last().copied(), Some(result.best.score));
    }

    #[test]
    fn test_run_with_callback() {
        let config = small_config(4, 6);
        let grid = ProbabilityGrid::uniform(10).unwrap();

        let mut optimizer = SwarmOptimizer::new(config, grid).unwrap();
        let mut seen = Vec::new();
        let result = optimizer.run_with_callback(|progress| seen.push(progress.iteration));

        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(result.stats.iterations, 6);
        assert_eq!(result.stats.total_evaluations, 24);
        assert_eq!(result.history.best_score.len(), 6);
        assert_eq!(result.history.avg_score.len(), 6);
    }

    #[test]
    fn test_run_restarts_from_scratch() {
        let config = small_config(4, 3);
        let grid = ProbabilityGrid::uniform(10).unwrap();

        let mut optimizer = SwarmOptimizer::new(config, grid).unwrap();
        optimizer.run();
        let second = optimizer.run();

        assert_eq!(second.stats.iterations, 3);
        assert_eq!(second.history.best_score.len(), 3);
    }
}
