//! Orbital elements derived from instantaneous state vectors
//!
//! Only what the analytics need: specific angular momentum, eccentricity
//! and perihelion distance. Nothing here is stored on a body; elements are
//! recomputed from position and velocity each time they are asked for.

use crate::error::{SimError, SimResult};
use crate::simulation::states::NVec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// |h| with h = r x v
    pub angular_momentum: f64,
    /// |e| with e = (v x h) / mu - r / |r|
    pub eccentricity: f64,
    /// Closest approach to the primary, in the units of `r`
    pub perihelion: f64,
}

impl OrbitalElements {
    /// Elements of the osculating orbit around a primary with gravitational
    /// parameter `mu`, for position `r` and velocity `v` relative to it.
    ///
    /// Returns `None` for `mu <= 0`, a zero position, or a non-finite result.
    pub fn from_state(r: &NVec3, v: &NVec3, mu: f64) -> Option<Self> {
        if !(mu > 0.0) {
            return None;
        }
        let r_mag = r.norm();
        if r_mag == 0.0 {
            return None;
        }

        let h = r.cross(v);
        let h_mag = h.norm();

        let e_vec = v.cross(&h) / mu - r / r_mag;
        let eccentricity = e_vec.norm();

        // q = h^2 / (mu (1 + e)) stays well-behaved as e -> 1, where a(1 - e)
        // would need a semi-major axis that diverges
        let perihelion = h_mag * h_mag / (mu * (1.0 + eccentricity));

        perihelion.is_finite().then_some(Self {
            angular_momentum: h_mag,
            eccentricity,
            perihelion,
        })
    }
}

/// Perihelion distance for `r`, `v` around a primary of `primary_mass`
pub fn perihelion(r: &NVec3, v: &NVec3, primary_mass: f64, g: f64) -> Option<f64> {
    OrbitalElements::from_state(r, v, g * primary_mass).map(|el| el.perihelion)
}

/// Element extraction bound to one primary. Construction rejects a
/// non-positive gravitational parameter so per-frame calls cannot hit it.
#[derive(Debug, Clone, Copy)]
pub struct ElementExtractor {
    mu: f64,
}

impl ElementExtractor {
    pub fn new(g: f64, primary_mass: f64) -> SimResult<Self> {
        let mu = g * primary_mass;
        if !(mu > 0.0) {
            return Err(SimError::InvalidConfiguration(format!(
                "gravitational parameter must be positive, got G = {g}, M = {primary_mass}"
            )));
        }
        Ok(Self { mu })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn elements(&self, r: &NVec3, v: &NVec3) -> Option<OrbitalElements> {
        OrbitalElements::from_state(r, v, self.mu)
    }

    pub fn perihelion(&self, r: &NVec3, v: &NVec3) -> Option<f64> {
        self.elements(r, v).map(|el| el.perihelion)
    }
}

/// Speed of a circular orbit of radius `r`
pub fn circular_speed(mu: f64, r: f64) -> f64 {
    (mu / r).sqrt()
}

/// Vis-viva speed at radius `r` on an orbit with semi-major axis `a`
pub fn vis_viva_speed(mu: f64, r: f64, a: f64) -> f64 {
    (mu * (2.0 / r - 1.0 / a)).sqrt()
}
