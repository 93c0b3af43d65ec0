//! Particles and the random source that drives them.

use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::schema::{Placement, SwarmConfig};

/// Random number generator wrapper for swarm operations.
pub struct SwarmRng {
    rng: StdRng,
}

impl SwarmRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Positions drawn uniformly over `[0, area_size]` per coordinate.
    pub fn random_placement(&mut self, num_agents: usize, area_size: f64) -> Placement {
        (0..num_agents)
            .map(|_| {
                (
                    self.rng.gen_range(0.0..=area_size),
                    self.rng.gen_range(0.0..=area_size),
                )
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// Velocity drawn from a standard normal per coordinate.
    pub fn random_velocity(&mut self, num_agents: usize) -> Vec<(f64, f64)> {
        (0..num_agents)
            .map(|_| {
                (
                    self.rng.sample(StandardNormal),
                    self.rng.sample(StandardNormal),
                )
            })
            .collect()
    }

    /// Cognitive and social coefficients `(r1, r2)`, each uniform in `[0, 1)`.
    pub fn coefficients(&mut self) -> (f64, f64) {
        (self.rng.r#gen::<f64>(), self.rng.r#gen::<f64>())
    }
}

/// One candidate placement of all drones, with momentum and memory.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Current placement.
    pub position: Placement,
    /// Per-coordinate velocity, paired with `position` by index.
    pub velocity: Vec<(f64, f64)>,
    /// Best placement this particle has seen.
    pub best_position: Placement,
    /// Score of `best_position`; `None` until the first evaluation.
    pub best_score: Option<f64>,
    /// Score from the most recent evaluation.
    pub score: f64,
}

impl Particle {
    pub fn new(position: Placement, velocity: Vec<(f64, f64)>) -> Self {
        Self {
            best_position: position.clone(),
            position,
            velocity,
            best_score: None,
            score: 0.0,
        }
    }

    /// Store an evaluation of the current position. Returns true when it
    /// strictly improves on the personal best.
    pub fn record(&mut self, score: f64) -> bool {
        self.score = score;
        match self.best_score {
            Some(best) if score <= best => false,
            _ => {
                self.best_score = Some(score);
                self.best_position = self.position.clone();
                true
            }
        }
    }

    /// Move toward the personal and global bests.
    ///
    /// The same `(r1, r2)` pair scales every coordinate of the particle.
    pub fn step(
        &mut self,
        global_best: &Placement,
        (r1, r2): (f64, f64),
        weights: &SwarmConfig,
        area_size: f64,
    ) {
        let cognitive = weights.cognitive_weight * r1;
        let social = weights.social_weight * r2;

        let agents = self
            .position
            .agents_mut()
            .iter_mut()
            .zip(self.velocity.iter_mut())
            .zip(self.best_position.agents())
            .zip(global_best.agents());

        for ((((x, y), (vx, vy)), &(px, py)), &(gx, gy)) in agents {
            *vx = weights.inertia_weight * *vx + cognitive * (px - *x) + social * (gx - *x);
            *vy = weights.inertia_weight * *vy + cognitive * (py - *y) + social * (gy - *y);
            *x += *vx;
            *y += *vy;
        }

        self.position.clamp_to(area_size);
    }
}
