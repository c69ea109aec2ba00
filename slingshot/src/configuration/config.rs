//! Configuration types for loading simulation scenarios from YAML.
//!
//! A scenario consists of:
//!
//! - [`EngineConfig`]     – frame-step ceiling, sub-step cap, probe on/off, flyby target
//! - [`ParametersConfig`] – gravitational constant, distance scales, softening radii
//! - [`PathConfig`]       – how the probe's path is recorded and bounded
//! - [`PrimaryConfig`], [`PlanetConfig`], [`ProbeConfig`] – the bodies
//! - [`ScenarioConfig`]   – top-level wrapper
//!
//! Every section has defaults matching the reference mission (Parker Solar
//! Probe launch, 2018-08-12), so a YAML file only needs what it changes.
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   time_scale: 1.0          # simulated days per real second (runner default)
//!   max_frame_step: 0.0333   # wall-clock ceiling per frame, seconds
//!   max_substeps: 100
//!   include_probe: true
//!   flyby_target: venus
//!
//! parameters:
//!   G: 0.00463
//!   km_per_unit: 6.0e6
//!   km_per_au: 1.496e8
//!   primary_softening: 5.0
//!   secondary_softening: 0.05
//!   flyby_threshold_km: 8.0e6
//!   wrap_fraction: 0.9
//!
//! start_date: "2018-08-12T07:31:00Z"
//!
//! primary: { id: sun, mass: 1000.0 }
//!
//! planets:
//!   - { id: earth, kind: earth, mass: 0.3, distance_au: 1.0,
//!       velocity_multiplier: 0.98, phase_deg: 319.4, inclination_deg: 0.0 }
//!
//! probe:
//!   id: parker-probe
//!   mass: 1.0e-5
//!   aphelion_au: 0.98
//!   perihelion_au: 0.25
//!   launch_planet: earth
//! ```

use std::io::Read;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::simulation::states::Planet;

const EARTH_MASS: f64 = 0.3;

/// Parker Solar Probe launch, 2018-08-12T07:31:00Z
const LAUNCH_TIMESTAMP: i64 = 1_534_059_060;

/// Runtime engine options
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub time_scale: f64,      // default simulated days per real second for drivers
    pub max_frame_step: f64,  // ceiling on a frame's wall-clock delta, seconds
    pub max_substeps: usize,  // hard cap on Verlet sub-steps per frame
    pub include_probe: bool,  // `false` - planets only
    pub flyby_target: Planet, // planet the flyby detector watches
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_frame_step: 1.0 / 30.0,
            max_substeps: 100,
            include_probe: true,
            flyby_target: Planet::Venus,
        }
    }
}

/// Physical constants and scales
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ParametersConfig {
    #[serde(rename = "G")]
    pub g: f64,                   // gravitational constant, tuned for a ~365 day orbit at r = 25, M = 1000
    pub km_per_unit: f64,         // 1 sim unit in km
    pub km_per_au: f64,           // 1 AU in km
    pub primary_softening: f64,   // softening radius around the primary
    pub secondary_softening: f64, // softening radius around planets, small so flybys matter
    pub flyby_threshold_km: f64,  // closest approach below this counts as a flyby
    pub wrap_fraction: f64,       // orbit completion band, fraction of pi
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            g: 0.00463,
            km_per_unit: 6.0e6,
            km_per_au: 149.6e6,
            primary_softening: 5.0,
            secondary_softening: 0.05,
            flyby_threshold_km: 8.0e6,
            wrap_fraction: 0.9,
        }
    }
}

/// Probe path recording
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PathConfig {
    pub min_commit_distance_sq: f64, // squared sim units of movement before a point is kept
    pub max_points_per_phase: usize, // includes the live point
    pub max_retained_phases: usize,  // older phases are dropped
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            min_commit_distance_sq: 0.05,
            max_points_per_phase: 10_000,
            max_retained_phases: 3,
        }
    }
}

/// The central mass, fixed at the origin
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PrimaryConfig {
    pub id: String,
    pub mass: f64,
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            id: "sun".into(),
            mass: 1000.0,
        }
    }
}

/// A planet on a near-circular orbit, placed by phase angle and inclination.
/// The ascending node lies on +x.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlanetConfig {
    pub id: String,
    pub kind: Planet,
    pub mass: f64,
    pub distance_au: f64,         // orbital radius
    pub velocity_multiplier: f64, // fraction of circular speed, < 1 starts at aphelion
    pub phase_deg: f64,           // heliocentric longitude at the start date
    #[serde(default)]
    pub inclination_deg: f64,     // tilt about the x axis
}

impl PlanetConfig {
    pub fn earth() -> Self {
        Self {
            id: "earth".into(),
            kind: Planet::Earth,
            mass: EARTH_MASS,
            distance_au: 1.0,
            velocity_multiplier: 0.98,
            phase_deg: 319.4,
            inclination_deg: 0.0, // defines the ecliptic
        }
    }

    pub fn venus() -> Self {
        Self {
            id: "venus".into(),
            kind: Planet::Venus,
            mass: EARTH_MASS * 0.815,
            distance_au: 0.723,
            velocity_multiplier: 0.98,
            phase_deg: 245.5,
            inclination_deg: 3.39,
        }
    }

    pub fn mercury() -> Self {
        Self {
            id: "mercury".into(),
            kind: Planet::Mercury,
            mass: EARTH_MASS * 0.0553,
            distance_au: 0.387,
            velocity_multiplier: 0.98,
            phase_deg: 226.5,
            inclination_deg: 7.005,
        }
    }
}

/// The dynamically integrated probe. It starts at aphelion of its first
/// solar orbit, in the ecliptic, at the launch planet's phase angle.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    pub id: String,
    pub mass: f64,
    pub aphelion_au: f64,
    pub perihelion_au: f64,
    pub launch_planet: Planet,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            id: "parker-probe".into(),
            mass: 1.0e-5,
            aphelion_au: 0.98,
            perihelion_au: 0.25,
            launch_planet: Planet::Earth,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub paths: PathConfig,
    pub start_date: DateTime<Utc>,
    pub primary: PrimaryConfig,
    pub planets: Vec<PlanetConfig>,
    pub probe: ProbeConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            parameters: ParametersConfig::default(),
            paths: PathConfig::default(),
            start_date: DateTime::from_timestamp(LAUNCH_TIMESTAMP, 0).unwrap_or_default(),
            primary: PrimaryConfig::default(),
            planets: vec![PlanetConfig::earth(), PlanetConfig::venus(), PlanetConfig::mercury()],
            probe: ProbeConfig::default(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> SimResult<Self> {
        serde_yaml::from_str(s).map_err(|e| SimError::InvalidConfiguration(e.to_string()))
    }

    pub fn from_reader<R: Read>(reader: R) -> SimResult<Self> {
        serde_yaml::from_reader(reader).map_err(|e| SimError::InvalidConfiguration(e.to_string()))
    }

    pub fn planet(&self, kind: Planet) -> Option<&PlanetConfig> {
        self.planets.iter().find(|p| p.kind == kind)
    }

    /// Checks the scalar settings. Body masses are checked when the bodies
    /// are built.
    pub fn validate(&self) -> SimResult<()> {
        let invalid = |msg: String| Err(SimError::InvalidConfiguration(msg));

        let p = &self.parameters;
        if !(p.g > 0.0) {
            return invalid(format!("G must be positive, got {}", p.g));
        }
        if !(p.km_per_unit > 0.0) || !(p.km_per_au > 0.0) {
            return invalid("distance scales must be positive".into());
        }
        if !(p.primary_softening >= 0.0) || !(p.secondary_softening >= 0.0) {
            return invalid("softening radii must not be negative".into());
        }
        if !(p.flyby_threshold_km > 0.0) {
            return invalid(format!("flyby_threshold_km must be positive, got {}", p.flyby_threshold_km));
        }
        if !(p.wrap_fraction > 0.0 && p.wrap_fraction <= 1.0) {
            return invalid(format!("wrap_fraction must be in (0, 1], got {}", p.wrap_fraction));
        }

        let e = &self.engine;
        if !(e.max_frame_step > 0.0) {
            return invalid(format!("max_frame_step must be positive, got {}", e.max_frame_step));
        }
        if e.max_substeps == 0 {
            return invalid("max_substeps must be at least 1".into());
        }

        for planet in &self.planets {
            if !(planet.distance_au > 0.0) {
                return invalid(format!("planet `{}` needs a positive distance", planet.id));
            }
        }

        if e.include_probe {
            let probe = &self.probe;
            if !(probe.perihelion_au > 0.0) || !(probe.aphelion_au >= probe.perihelion_au) {
                return invalid(format!(
                    "probe orbit needs 0 < perihelion <= aphelion, got {} / {}",
                    probe.perihelion_au, probe.aphelion_au
                ));
            }
        }

        Ok(())
    }
}
