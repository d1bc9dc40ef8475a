//! Plant models for closed-loop control simulation
//!
//! This crate provides:
//! - A second-order plant (damped point mass) driven by a control force
//! - Optional Gaussian acceleration disturbance for robustness experiments

pub mod plant;

pub use plant::*;
