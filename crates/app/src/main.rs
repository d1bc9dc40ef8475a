//! Closed-loop demo driver for the hybrid controller.
//!
//! Runs a multi-segment setpoint schedule against the simulated plant, logs
//! telemetry once per simulated second, and optionally writes the full tick
//! trace as JSON. Usage:
//!
//! ```text
//! hybrid-sim-app [config.json] [--trace trace.json]
//! ```

use std::{env, fs, process};

use control::{HybridConfig, HybridController};
use serde::{Deserialize, Serialize};
use simcore::StepResult;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

/// One stretch of the setpoint schedule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Segment {
    target: f64,
    duration_secs: f64,
}

/// Driver configuration, loadable from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SimulationConfig {
    /// Sample interval in seconds
    dt: f64,
    /// Setpoint schedule, run in order
    segments: Vec<Segment>,
    /// Controller configuration (defaults apply when omitted)
    #[serde(default)]
    controller: HybridConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            dt: 0.05,
            segments: vec![
                Segment {
                    target: 5.0,
                    duration_secs: 10.0,
                },
                Segment {
                    target: 1.0,
                    duration_secs: 10.0,
                },
            ],
            controller: HybridConfig::default(),
        }
    }
}

impl SimulationConfig {
    fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

/// One tick of the recorded trace
#[derive(Debug, Clone, Copy, Serialize)]
struct TelemetryRecord {
    t: f64,
    target: f64,
    #[serde(flatten)]
    step: StepResult,
}

fn main() {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );

    let mut config_path = None;
    let mut trace_path = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--trace" => trace_path = args.next(),
            _ => config_path = Some(arg),
        }
    }

    let config = match &config_path {
        Some(path) => match SimulationConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("failed to load config {path}: {e}");
                process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    if !(config.dt > 0.0) {
        log::error!("config dt must be positive, got {}", config.dt);
        process::exit(1);
    }

    log::info!(
        "starting: dt={}s, {} segment(s), gains kp={} ki={} kd={}",
        config.dt,
        config.segments.len(),
        config.controller.pid.kp,
        config.controller.pid.ki,
        config.controller.pid.kd,
    );

    let mut ctrl = HybridController::new(config.controller);
    let mut trace: Vec<TelemetryRecord> = Vec::new();
    let log_every = (1.0 / config.dt).round().max(1.0) as usize;
    let mut t = 0.0;

    for (index, segment) in config.segments.iter().enumerate() {
        let ticks = (segment.duration_secs / config.dt).round() as usize;
        log::info!(
            "segment {index}: target {} for {}s ({ticks} ticks)",
            segment.target,
            segment.duration_secs,
        );

        for tick in 0..ticks {
            let step = match ctrl.step(segment.target, config.dt) {
                Ok(step) => step,
                Err(e) => {
                    log::error!("tick failed: {e}");
                    process::exit(1);
                }
            };
            t += config.dt;

            if tick % log_every == 0 {
                log::info!(
                    "t={t:.2}s position={:.4} control={:.4} alpha={:.3}",
                    step.position,
                    step.applied_control,
                    step.blend_weight,
                );
            }
            if trace_path.is_some() {
                trace.push(TelemetryRecord {
                    t,
                    target: segment.target,
                    step,
                });
            }
        }

        let error = (segment.target - ctrl.position()).abs();
        log::info!(
            "segment {index} done: position={:.4} error={:.4} integral={:.4}",
            ctrl.position(),
            error,
            ctrl.pid().integral(),
        );
    }

    if let Some(path) = &trace_path {
        match serde_json::to_string_pretty(&trace) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::error!("failed to write trace {path}: {e}");
                    process::exit(1);
                }
                log::info!("wrote {} tick(s) to {path}", trace.len());
            }
            Err(e) => {
                log::error!("failed to serialize trace: {e}");
                process::exit(1);
            }
        }
    }
}
