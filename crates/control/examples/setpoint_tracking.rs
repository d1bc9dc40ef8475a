//! Setpoint Tracking Example
//!
//! Drives the hybrid controller toward a step setpoint and prints the
//! trajectory, showing the blend weight hand over from the reactive to the
//! predictive signal as the error shrinks.

use control::{HybridConfig, HybridController};

const DT: f64 = 0.1;
const TARGET: f64 = 5.0;
const TICKS: usize = 100;

fn main() {
    let mut ctrl = HybridController::new(HybridConfig::default());
    ctrl.set_gains(2.0, 0.1, 0.5);

    println!("{:>6} {:>10} {:>10} {:>8}", "t", "position", "control", "alpha");
    for tick in 0..TICKS {
        match ctrl.step(TARGET, DT) {
            Ok(result) => {
                if tick % 5 == 0 {
                    println!(
                        "{:>6.1} {:>10.4} {:>10.4} {:>8.3}",
                        tick as f64 * DT,
                        result.position,
                        result.applied_control,
                        result.blend_weight,
                    );
                }
            }
            Err(e) => {
                eprintln!("tick {tick} failed: {e}");
                return;
            }
        }
    }

    let error = (TARGET - ctrl.position()).abs();
    println!("final position {:.4} (error {:.4})", ctrl.position(), error);
}
