//! Second-Order Plant
//!
//! A damped point mass driven by a control force, advanced with semi-implicit
//! Euler integration. This is the real system the controller acts on, as
//! opposed to the simplified internal model the predictive search rolls out.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use simcore::{Model, PlantState};

/// Configuration for the second-order plant
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Viscous damping coefficient applied to velocity
    pub damping: f64,
    /// Standard deviation of the Gaussian acceleration disturbance (0 disables)
    pub noise_std: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        PlantConfig {
            damping: 0.5,
            noise_std: 0.0,
        }
    }
}

impl PlantConfig {
    /// Set the damping coefficient
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Set the disturbance standard deviation
    pub fn with_noise_std(mut self, noise_std: f64) -> Self {
        self.noise_std = noise_std;
        self
    }
}

/// Second-order plant with state
///
/// Dynamics: `acceleration = u - damping * velocity + disturbance`, then
/// velocity and position are integrated over the step. The disturbance is
/// drawn from `Normal(0, noise_std)` when enabled and is zero otherwise.
#[derive(Debug, Clone)]
pub struct SecondOrderPlant {
    config: PlantConfig,
    state: PlantState,
    disturbance: Option<Normal<f64>>,
    rng: StdRng,
}

impl SecondOrderPlant {
    /// Create a new plant with an entropy-seeded disturbance source
    pub fn new(config: PlantConfig) -> Self {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Create a new plant with a fixed disturbance seed (reproducible runs)
    pub fn with_seed(config: PlantConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: PlantConfig, rng: StdRng) -> Self {
        SecondOrderPlant {
            disturbance: Self::disturbance_for(config.noise_std),
            config,
            state: PlantState::default(),
            rng,
        }
    }

    // Normal::new only fails for a non-finite or negative std, both of which
    // also fail the > 0 guard.
    fn disturbance_for(noise_std: f64) -> Option<Normal<f64>> {
        if noise_std > 0.0 {
            Normal::new(0.0, noise_std).ok()
        } else {
            None
        }
    }

    /// Current plant state
    pub fn state(&self) -> PlantState {
        self.state
    }

    /// Current position
    pub fn position(&self) -> f64 {
        self.state.position
    }

    /// Current velocity
    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PlantConfig {
        &self.config
    }

    /// Enable or disable the acceleration disturbance
    pub fn set_noise(&mut self, noise_std: f64) {
        self.config.noise_std = noise_std;
        self.disturbance = Self::disturbance_for(noise_std);
        log::debug!("plant disturbance std set to {noise_std}");
    }

    /// Advance the plant by one step under control input `u`
    pub fn step(&mut self, u: f64, dt: f64) {
        let disturbance = match self.disturbance {
            Some(dist) => dist.sample(&mut self.rng),
            None => 0.0,
        };
        let acceleration = u - self.config.damping * self.state.velocity + disturbance;
        self.state.velocity += acceleration * dt;
        self.state.position += self.state.velocity * dt;
    }
}

impl Model for SecondOrderPlant {
    fn reset(&mut self) {
        self.state = PlantState::default();
    }
}
