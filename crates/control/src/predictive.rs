//! Predictive Search
//!
//! A fixed-horizon, fixed-grid search over candidate control inputs. Each
//! candidate is rolled forward through a simplified internal model of the
//! plant and scored with a quadratic tracking-plus-effort cost; the cheapest
//! candidate wins. This is a deliberately coarse, bounded local search with
//! deterministic execution time (candidates x horizon simulated steps per
//! call), not a gradient or QP solver.

use serde::{Deserialize, Serialize};
use simcore::{Model, PlantState};

/// Configuration for the predictive search
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictiveConfig {
    /// Number of simulated steps per candidate
    pub horizon: usize,
    /// Lower bound of the candidate grid (inclusive)
    pub u_min: f64,
    /// Upper bound of the candidate grid (inclusive)
    pub u_max: f64,
    /// Spacing between adjacent candidates
    pub u_step: f64,
    /// Velocity drag coefficient of the internal rollout model. Intentionally
    /// not the real plant's damping: the search plans on an approximate model
    /// and acts on the real system.
    pub drag: f64,
    /// Weight of the one-shot control-effort penalty
    pub effort_weight: f64,
}

impl Default for PredictiveConfig {
    fn default() -> Self {
        Self {
            horizon: 10,
            u_min: -10.0,
            u_max: 10.0,
            u_step: 0.5,
            drag: 0.1,
            effort_weight: 0.1,
        }
    }
}

impl PredictiveConfig {
    /// Set the rollout horizon
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the candidate grid bounds and spacing
    pub fn with_grid(mut self, u_min: f64, u_max: f64, u_step: f64) -> Self {
        self.u_min = u_min;
        self.u_max = u_max;
        self.u_step = u_step;
        self
    }

    /// Set the effort penalty weight
    pub fn with_effort_weight(mut self, effort_weight: f64) -> Self {
        self.effort_weight = effort_weight;
        self
    }
}

/// Fixed-grid predictive controller
///
/// `plan` is a pure function of the plant state, target and interval: it never
/// mutates anything and two identical calls return bit-identical output.
#[derive(Debug, Clone)]
pub struct PredictiveController {
    config: PredictiveConfig,
}

impl PredictiveController {
    /// Create a new controller with the given configuration
    pub fn new(config: PredictiveConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PredictiveConfig {
        &self.config
    }

    /// Number of candidates in the grid, both endpoints included
    pub fn candidate_count(&self) -> usize {
        ((self.config.u_max - self.config.u_min) / self.config.u_step).round() as usize + 1
    }

    /// Pick the candidate control input with the smallest rollout cost.
    ///
    /// Candidates are generated by integer index rather than repeated
    /// addition of the step, so the upper endpoint is never skipped or
    /// duplicated by accumulated floating-point error.
    pub fn plan(&self, state: PlantState, target: f64, dt: f64) -> f64 {
        let mut best_u = 0.0;
        let mut min_cost = f64::INFINITY;

        for k in 0..self.candidate_count() {
            let u = self.config.u_min + self.config.u_step * k as f64;
            let cost = self.rollout_cost(state, target, u, dt);
            // Strict comparison: on a cost tie the lowest candidate,
            // encountered first in ascending order, wins.
            if cost < min_cost {
                min_cost = cost;
                best_u = u;
            }
        }

        best_u
    }

    fn rollout_cost(&self, state: PlantState, target: f64, u: f64, dt: f64) -> f64 {
        let mut cost = 0.0;
        let mut p = state.position;
        let mut v = state.velocity;

        for _ in 0..self.config.horizon {
            let acceleration = u - self.config.drag * v;
            v += acceleration * dt;
            p += v * dt;

            let error = target - p;
            cost += error * error;
        }

        cost + self.config.effort_weight * u * u
    }
}

impl Model for PredictiveController {
    fn reset(&mut self) {
        // No internal state to reset: planning is stateless
    }
}
