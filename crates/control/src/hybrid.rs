//! Hybrid Setpoint Controller
//!
//! Runs one PID evaluation and one predictive search per tick, mixes the two
//! commands with an error-dependent blend weight, and drives the simulated
//! plant with the result. The controller owns all loop state: callers create
//! as many independent instances as they need and drive each one sequentially.

use mechanics::{PlantConfig, SecondOrderPlant};
use serde::{Deserialize, Serialize};
use simcore::{ControlError, ControlResult, Model, PlantState, StepResult};

use crate::blend::{BlendStrategy, LinearBlend, blend_weight};
use crate::pid::{PidConfig, PidController};
use crate::predictive::{PredictiveConfig, PredictiveController};

/// Configuration for the hybrid controller
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Reactive (PID) controller gains
    pub pid: PidConfig,
    /// Predictive search configuration
    pub predictive: PredictiveConfig,
    /// Plant model configuration
    pub plant: PlantConfig,
    /// Error band over which the blend weight ramps from 0 to 1
    pub blend_band: f64,
    /// Minimum applied control
    pub output_min: f64,
    /// Maximum applied control
    pub output_max: f64,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            pid: PidConfig::default(),
            predictive: PredictiveConfig::default(),
            plant: PlantConfig::default(),
            blend_band: 5.0,
            output_min: -10.0,
            output_max: 10.0,
        }
    }
}

impl HybridConfig {
    /// Set the PID gain set
    pub fn with_pid(mut self, pid: PidConfig) -> Self {
        self.pid = pid;
        self
    }

    /// Set the predictive search configuration
    pub fn with_predictive(mut self, predictive: PredictiveConfig) -> Self {
        self.predictive = predictive;
        self
    }

    /// Set the plant configuration
    pub fn with_plant(mut self, plant: PlantConfig) -> Self {
        self.plant = plant;
        self
    }

    /// Set the blend error band
    pub fn with_blend_band(mut self, blend_band: f64) -> Self {
        self.blend_band = blend_band;
        self
    }

    /// Set the applied-control limits
    pub fn with_limits(mut self, min: f64, max: f64) -> Self {
        self.output_min = min;
        self.output_max = max;
        self
    }
}

/// Hybrid controller with state
pub struct HybridController {
    config: HybridConfig,
    pid: PidController,
    predictive: PredictiveController,
    plant: SecondOrderPlant,
    blend: Box<dyn BlendStrategy>,
}

impl HybridController {
    /// Create a new controller with the default linear blend strategy
    pub fn new(config: HybridConfig) -> Self {
        Self::with_blend_strategy(config, Box::new(LinearBlend))
    }

    /// Create a new controller with a specific blend strategy.
    ///
    /// Substitute strategies must preserve linear-interpolation semantics:
    /// `alpha * u_reactive + (1 - alpha) * u_predictive`.
    pub fn with_blend_strategy(config: HybridConfig, blend: Box<dyn BlendStrategy>) -> Self {
        Self {
            pid: PidController::new(config.pid),
            predictive: PredictiveController::new(config.predictive),
            plant: SecondOrderPlant::new(config.plant),
            config,
            blend,
        }
    }

    /// Overwrite the PID gains; effective from the next tick
    pub fn set_gains(&mut self, kp: f64, ki: f64, kd: f64) {
        self.pid.set_gains(kp, ki, kd);
        log::debug!("pid gains updated: kp={kp} ki={ki} kd={kd}");
    }

    /// Enable or disable the plant acceleration disturbance
    pub fn set_noise(&mut self, noise_std: f64) {
        self.plant.set_noise(noise_std);
    }

    /// Current plant position, read without advancing state
    pub fn position(&self) -> f64 {
        self.plant.position()
    }

    /// Snapshot of the current plant state
    pub fn plant_state(&self) -> PlantState {
        self.plant.state()
    }

    /// The reactive controller (for telemetry: integral and last-error terms)
    pub fn pid(&self) -> &PidController {
        &self.pid
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &HybridConfig {
        &self.config
    }

    /// Advance one control tick.
    ///
    /// Sequence: PID evaluation, predictive search, blending, plant update —
    /// each exactly once, in that order. The interval is validated before any
    /// state is touched, so a rejected tick leaves the controller unchanged.
    pub fn step(&mut self, target: f64, dt: f64) -> ControlResult<StepResult> {
        if !(dt > 0.0) {
            return Err(ControlError::InvalidInterval(dt));
        }

        let state = self.plant.state();
        let error = target - state.position;

        let u_reactive = self.pid.update(error, dt);
        let u_predictive = self.predictive.plan(state, target, dt);

        let alpha = blend_weight(error, self.config.blend_band);
        let u = self
            .blend
            .blend(u_reactive, u_predictive, alpha)
            .clamp(self.config.output_min, self.config.output_max);

        self.plant.step(u, dt);

        Ok(StepResult {
            position: self.plant.position(),
            applied_control: u,
            blend_weight: alpha,
        })
    }
}

impl Model for HybridController {
    fn reset(&mut self) {
        self.pid.reset();
        self.predictive.reset();
        self.plant.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_then_read_is_zero() {
        let mut ctrl = HybridController::new(HybridConfig::default());
        ctrl.step(3.0, 0.1).unwrap();
        assert!(ctrl.position() != 0.0);

        ctrl.reset();
        assert_eq!(ctrl.position(), 0.0);
        assert_eq!(ctrl.plant_state().velocity, 0.0);
        assert_eq!(ctrl.pid().integral(), 0.0);
        assert_eq!(ctrl.pid().last_error(), 0.0);
    }

    #[test]
    fn test_rejects_non_positive_interval_without_mutation() {
        let mut ctrl = HybridController::new(HybridConfig::default());
        for dt in [0.0, -0.1, f64::NAN] {
            let err = ctrl.step(5.0, dt).unwrap_err();
            assert!(matches!(err, ControlError::InvalidInterval(_)));
        }
        // No partial mutation from the rejected ticks
        assert_eq!(ctrl.position(), 0.0);
        assert_eq!(ctrl.pid().integral(), 0.0);
        assert_eq!(ctrl.pid().last_error(), 0.0);

        // A valid tick afterwards behaves like the first tick of a fresh run
        let mut fresh = HybridController::new(HybridConfig::default());
        let a = ctrl.step(5.0, 0.1).unwrap();
        let b = fresh.step(5.0, 0.1).unwrap();
        assert_eq!(a.applied_control, b.applied_control);
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn test_full_reactive_at_band_edge() {
        // Error of exactly one band width: the blend selects the PID signal
        // alone, and the plant integrates it from rest.
        let mut ctrl = HybridController::new(HybridConfig::default());
        ctrl.set_gains(1.0, 0.0, 0.0);

        let result = ctrl.step(5.0, 0.1).unwrap();
        assert_eq!(result.blend_weight, 1.0);
        assert_eq!(result.applied_control, 5.0); // kp * error, under the clamp
        // velocity = u * dt, position = velocity * dt
        assert!((result.position - 0.05).abs() < 1e-12);
        assert!((ctrl.plant_state().velocity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_applied_control_clamped_to_limits() {
        // Default gains on a 5-unit error ask for more than the actuator has
        let mut ctrl = HybridController::new(HybridConfig::default());
        let result = ctrl.step(5.0, 0.1).unwrap();
        assert_eq!(result.applied_control, 10.0);
    }

    #[test]
    fn test_zero_gains_full_error_yields_zero_control() {
        let mut ctrl = HybridController::new(HybridConfig::default());
        ctrl.set_gains(0.0, 0.0, 0.0);

        let result = ctrl.step(5.0, 0.1).unwrap();
        // alpha saturates at 1.0, so the blend discards the predictive term
        // and the zeroed PID contributes nothing
        assert_eq!(result.blend_weight, 1.0);
        assert_eq!(result.applied_control, 0.0);
        assert_eq!(result.position, 0.0);
    }

    #[test]
    fn test_small_error_trusts_predictive_term() {
        let mut ctrl = HybridController::new(HybridConfig::default());
        ctrl.set_gains(0.0, 0.0, 0.0);

        // Error of 1.0 from rest: alpha = 0.2, predictive search asks for 2.5
        let result = ctrl.step(1.0, 0.1).unwrap();
        assert!((result.blend_weight - 0.2).abs() < 1e-12);
        assert!((result.applied_control - 0.8 * 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_closed_loop_converges() {
        // 200 ticks toward a unit setpoint with a well-damped tuning
        let mut ctrl = HybridController::new(HybridConfig::default());
        ctrl.set_gains(2.0, 0.1, 0.5);

        let mut last = 0.0;
        for _ in 0..200 {
            let result = ctrl.step(1.0, 0.1).unwrap();
            last = result.position;
            let integral = ctrl.pid().integral();
            assert!(integral > -10.0 && integral < 10.0);
        }
        assert!(
            (last - 1.0).abs() < 0.05,
            "expected convergence to 1.0, got {last}"
        );
    }

    #[test]
    fn test_integral_windup_bounded_under_sustained_error() {
        let mut ctrl = HybridController::new(HybridConfig::default());
        let mut hit_limit = false;
        for _ in 0..300 {
            ctrl.step(100.0, 0.1).unwrap();
            let integral = ctrl.pid().integral();
            assert!(integral <= 10.0);
            if integral == 10.0 {
                hit_limit = true;
            }
        }
        assert!(hit_limit, "anti-windup clamp never engaged");

        ctrl.reset();
        let mut hit_limit = false;
        for _ in 0..300 {
            ctrl.step(-100.0, 0.1).unwrap();
            let integral = ctrl.pid().integral();
            assert!(integral >= -10.0);
            if integral == -10.0 {
                hit_limit = true;
            }
        }
        assert!(hit_limit, "anti-windup clamp never engaged in reverse");
    }

    #[test]
    fn test_set_gains_applies_on_next_tick() {
        let mut a = HybridController::new(HybridConfig::default());
        let mut b = HybridController::new(HybridConfig::default());
        a.step(2.0, 0.1).unwrap();
        b.step(2.0, 0.1).unwrap();

        a.set_gains(0.5, 0.0, 0.0);
        let ra = a.step(2.0, 0.1).unwrap();
        let rb = b.step(2.0, 0.1).unwrap();
        assert!(ra.applied_control != rb.applied_control);
    }

    struct PredictiveOnly;

    impl BlendStrategy for PredictiveOnly {
        fn blend(&self, _u_reactive: f64, u_predictive: f64, _alpha: f64) -> f64 {
            u_predictive
        }

        fn box_clone(&self) -> Box<dyn BlendStrategy> {
            Box::new(PredictiveOnly)
        }
    }

    #[test]
    fn test_blend_strategy_is_injectable() {
        let mut ctrl =
            HybridController::with_blend_strategy(HybridConfig::default(), Box::new(PredictiveOnly));
        // With the strategy ignoring the reactive signal, the applied control
        // is the raw predictive plan (10.0 for a 5-unit error from rest).
        let result = ctrl.step(5.0, 0.1).unwrap();
        assert_eq!(result.applied_control, 10.0);
    }

    #[test]
    fn test_read_does_not_advance_state() {
        let ctrl = HybridController::new(HybridConfig::default());
        assert_eq!(ctrl.position(), 0.0);
        assert_eq!(ctrl.position(), 0.0);
    }
}
