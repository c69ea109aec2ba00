//! Core state types for the star-planet-probe simulation.
//!
//! Defines the body/system structs:
//! - `Body`   one gravitating body with its resolved `BodyRole`
//! - `System` the body set plus elapsed simulated time `t` (days)
//!
//! Roles are resolved once when a scenario is built, so the frame loop
//! never dispatches on body ids.

use std::f64::consts::TAU;

use nalgebra::Vector3;
use serde::Deserialize;

use crate::error::{SimError, SimResult};
use crate::simulation::phases::PhaseTrack;

pub type NVec3 = Vector3<f64>;

/// Planets a scenario can place around the primary
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
}

impl Planet {
    /// Axial rotation rate in radians per simulated day
    pub fn spin_rate(self) -> f64 {
        match self {
            Planet::Venus => -TAU / 243.0, // retrograde, 243 day sidereal rotation
            Planet::Mercury | Planet::Earth => TAU,
        }
    }
}

/// What a body is to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRole {
    Primary,           // central mass, never integrated
    Secondary(Planet), // two-body orbit around the primary
    Probe,             // feels the primary and every secondary
}

impl BodyRole {
    pub fn spin_rate(self) -> f64 {
        match self {
            BodyRole::Secondary(planet) => planet.spin_rate(),
            BodyRole::Primary | BodyRole::Probe => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: String,
    pub role: BodyRole,
    pub x: NVec3,                         // position (sim units)
    pub v: NVec3,                         // velocity (sim units / day)
    pub m: f64,                           // mass
    pub spin: f64,                        // rotation angle (rad)
    pub a: Option<NVec3>,                 // acceleration carried between sub-steps, None before the first frame
    pub orbit_path: Option<Vec<NVec3>>,   // precomputed static path
    pub orbit_phases: Option<PhaseTrack>, // dynamically recorded path
}

impl Body {
    /// Create a body; the mass must be strictly positive
    pub fn new(id: impl Into<String>, role: BodyRole, x: NVec3, v: NVec3, m: f64) -> SimResult<Self> {
        let id = id.into();
        // `!(m > 0.0)` also rejects NaN
        if !(m > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "body `{id}` must have positive mass, got {m}"
            )));
        }

        Ok(Self {
            id,
            role,
            x,
            v,
            m,
            spin: 0.0,
            a: None,
            orbit_path: None,
            orbit_phases: None,
        })
    }

    pub fn is_primary(&self) -> bool {
        self.role == BodyRole::Primary
    }

    /// Speed in sim units per day
    pub fn speed(&self) -> f64 {
        self.v.norm()
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // integration order
    pub t: f64,            // elapsed simulated time (days)
}

impl System {
    pub fn new(bodies: Vec<Body>) -> Self {
        Self { bodies, t: 0.0 }
    }

    /// Index of the first body with `role`
    pub fn index_of(&self, role: BodyRole) -> Option<usize> {
        self.bodies.iter().position(|b| b.role == role)
    }

    pub fn primary(&self) -> Option<&Body> {
        self.bodies.iter().find(|b| b.is_primary())
    }

    pub fn find(&self, id: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }
}
