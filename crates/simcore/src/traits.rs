use serde::{Deserialize, Serialize};

// Plant state

/// True state of the simulated plant.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlantState {
    /// Position of the plant (plant units)
    pub position: f64,
    /// Velocity of the plant (plant units per second)
    pub velocity: f64,
}

// Controller output

/// Result of one control tick, returned to the driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepResult {
    /// Plant position after the tick
    pub position: f64,
    /// Control input applied to the plant this tick (after blending and clamping)
    pub applied_control: f64,
    /// Blend weight used this tick: 1.0 = fully reactive, 0.0 = fully predictive
    pub blend_weight: f64,
}

// General Traits

pub trait Model {
    fn reset(&mut self);
}
