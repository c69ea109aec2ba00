//! Per-frame input and output of [`Scenario::tick`](super::scenario::Scenario::tick)

use chrono::{DateTime, Utc};

use crate::simulation::events::{FlybyEvent, PerihelionSample};
use crate::simulation::integrator::FrameStep;

/// What the presentation layer hands the engine each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub wall_dt: f64,    // real seconds since the previous frame
    pub time_scale: f64, // simulated days per real second
    pub paused: bool,
}

impl FrameInput {
    pub fn running(wall_dt: f64, time_scale: f64) -> Self {
        Self {
            wall_dt,
            time_scale,
            paused: false,
        }
    }

    pub fn paused() -> Self {
        Self {
            wall_dt: 0.0,
            time_scale: 0.0,
            paused: true,
        }
    }
}

/// Distances and speeds for display, in physical units
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Telemetry {
    pub sun_earth_distance_km: Option<f64>,
    pub probe_sun_distance_km: Option<f64>,
    pub earth_speed_kms: Option<f64>,
}

/// Everything one tick produced
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub date: DateTime<Utc>,
    pub step: Option<FrameStep>, // None when paused
    pub flybys: Vec<FlybyEvent>,
    pub perihelion_samples: Vec<PerihelionSample>,
    pub year_rollover: Option<i32>,
    pub telemetry: Telemetry,
}

impl FrameOutput {
    pub(crate) fn idle(date: DateTime<Utc>, telemetry: Telemetry) -> Self {
        Self {
            date,
            step: None,
            flybys: Vec::new(),
            perihelion_samples: Vec::new(),
            year_rollover: None,
            telemetry,
        }
    }

    pub fn advanced(&self) -> bool {
        self.step.is_some()
    }
}
