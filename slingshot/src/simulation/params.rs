//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - gravitational constant `g` in sim units^3 / (mass * day^2),
//! - distance scales (km per sim unit, km per AU),
//! - softening radii around the primary and around planets,
//! - flyby threshold and the orbit-completion wrap band

use crate::configuration::config::ParametersConfig;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub g: f64,                   // gravitational constant
    pub km_per_unit: f64,         // 1 sim unit in km
    pub km_per_au: f64,           // 1 AU in km
    pub primary_softening: f64,   // softening radius around the primary
    pub secondary_softening: f64, // softening radius around planets
    pub flyby_threshold_km: f64,  // closest approach below this counts as a flyby
    pub wrap_fraction: f64,       // branch-cut band as a fraction of pi
}

impl Parameters {
    /// Length of one AU in sim units
    pub fn au_in_units(&self) -> f64 {
        self.km_per_au / self.km_per_unit
    }

    pub fn units_to_au(&self, d: f64) -> f64 {
        d / self.au_in_units()
    }

    pub fn au_to_units(&self, au: f64) -> f64 {
        au * self.au_in_units()
    }

    pub fn units_to_km(&self, d: f64) -> f64 {
        d * self.km_per_unit
    }

    pub fn flyby_threshold_units(&self) -> f64 {
        self.flyby_threshold_km / self.km_per_unit
    }
}

impl From<&ParametersConfig> for Parameters {
    fn from(cfg: &ParametersConfig) -> Self {
        Self {
            g: cfg.g,
            km_per_unit: cfg.km_per_unit,
            km_per_au: cfg.km_per_au,
            primary_softening: cfg.primary_softening,
            secondary_softening: cfg.secondary_softening,
            flyby_threshold_km: cfg.flyby_threshold_km,
            wrap_fraction: cfg.wrap_fraction,
        }
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self::from(&ParametersConfig::default())
    }
}
