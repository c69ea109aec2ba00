//! High-level runtime engine settings
//!
//! Frame-step ceiling, sub-step cap, whether the probe is simulated and
//! which planet the flyby detector watches

use crate::configuration::config::EngineConfig;
use crate::simulation::states::Planet;

#[derive(Debug, Clone)]
pub struct Engine {
    pub max_frame_step: f64,  // ceiling on the wall-clock delta of one frame (s)
    pub max_substeps: usize,  // hard cap on Verlet sub-steps per frame
    pub include_probe: bool,  // false = planets only, no detectors
    pub flyby_target: Planet, // planet the flyby detector measures against
}

impl From<&EngineConfig> for Engine {
    fn from(cfg: &EngineConfig) -> Self {
        Self {
            max_frame_step: cfg.max_frame_step,
            max_substeps: cfg.max_substeps,
            include_probe: cfg.include_probe,
            flyby_target: cfg.flyby_target,
        }
    }
}
