//! Hybrid control for single-axis setpoint tracking
//!
//! This crate provides:
//! - A PID controller with integral anti-windup
//! - A fixed-horizon predictive search over a candidate control grid
//! - Blending strategies for mixing the two control signals
//! - A hybrid controller that runs the full loop against a simulated plant

pub mod blend;
pub mod hybrid;
pub mod pid;
pub mod predictive;

pub use blend::*;
pub use hybrid::*;
pub use pid::*;
pub use predictive::*;
