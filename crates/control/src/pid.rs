//! PID Controller
//!
//! A proportional-integral-derivative controller with integral clamping
//! (anti-windup). Without the clamp the integral term grows without bound
//! during sustained large errors (e.g. at startup) and causes overshoot once
//! the error reverses; clamping to a fixed symmetric band bounds the integral
//! contribution independent of tuning.

use serde::{Deserialize, Serialize};
use simcore::Model;

/// Default integral accumulator limit
pub const DEFAULT_INTEGRAL_LIMIT: f64 = 10.0;

/// Gain set for a PID controller
///
/// Gains are a tuning choice, not validated: zero or negative values are
/// accepted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PidConfig {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
    /// Maximum integral accumulator magnitude (anti-windup)
    pub i_max: f64,
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: 2.0,
            ki: 0.5,
            kd: 0.1,
            i_max: DEFAULT_INTEGRAL_LIMIT,
        }
    }
}

impl PidConfig {
    /// Create a config with the given gains and the default integral limit
    pub fn pid(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            ..Default::default()
        }
    }

    /// Set the integral anti-windup limit
    pub fn with_i_max(mut self, i_max: f64) -> Self {
        self.i_max = i_max;
        self
    }
}

/// PID controller with state
#[derive(Debug, Clone)]
pub struct PidController {
    config: PidConfig,
    integral: f64,
    last_error: f64,
}

impl PidController {
    /// Create a new controller with the given gain set
    pub fn new(config: PidConfig) -> Self {
        Self {
            config,
            integral: 0.0,
            last_error: 0.0,
        }
    }

    /// Overwrite the three gains, keeping the integral limit
    pub fn set_gains(&mut self, kp: f64, ki: f64, kd: f64) {
        self.config.kp = kp;
        self.config.ki = ki;
        self.config.kd = kd;
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &PidConfig {
        &self.config
    }

    /// Current integral accumulator value
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Tracking error from the previous evaluation (0.0 before the first)
    pub fn last_error(&self) -> f64 {
        self.last_error
    }

    /// One PID evaluation. Must run exactly once per tick: a second call in
    /// the same tick double-integrates and corrupts the derivative term.
    ///
    /// Precondition: `dt != 0` (the derivative term divides by it). The tick
    /// orchestrator validates the interval before calling in.
    pub fn update(&mut self, error: f64, dt: f64) -> f64 {
        self.integral += error * dt;
        self.integral = self.integral.clamp(-self.config.i_max, self.config.i_max);

        let derivative = (error - self.last_error) / dt;
        self.last_error = error;

        self.config.kp * error + self.config.ki * self.integral + self.config.kd * derivative
    }
}

impl Model for PidController {
    fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
    }
}
