//! Force / acceleration model for the star-planet-probe engine
//!
//! Gravity here is a reduced model: every body feels a fixed influence set
//! rather than all pairs. Planets feel only the primary; the probe feels the
//! primary plus every planet. Each influencer carries its own softening
//! radius, wide around the primary and narrow around planets, so that a
//! close planetary pass visibly bends the probe's path.

use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, BodyRole, NVec3};
use crate::simulation::vecmath::normalize_or_zero;

/// One gravitating source as seen by the body being advanced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influencer {
    pub x: NVec3,         // position
    pub m: f64,           // mass
    pub softening: f64,   // minimum separation used in the force law
}

/// Trait for acceleration sources acting on a single body.
/// Implementations return the summed acceleration at position `x`.
pub trait Acceleration {
    fn acceleration(&self, x: &NVec3, influencers: &[Influencer]) -> NVec3;
}

/// Newtonian gravity with a squared-distance floor per influencer
#[derive(Debug, Clone, Copy)]
pub struct SoftenedGravity {
    pub g: f64, // gravitational constant
}

impl Acceleration for SoftenedGravity {
    fn acceleration(&self, x: &NVec3, influencers: &[Influencer]) -> NVec3 {
        let mut total = NVec3::zeros();

        for inf in influencers {
            // r points from the body toward the influencer
            let r = inf.x - x;

            // Clamp |r|^2 from below so a close pass can never produce a
            // singular force
            let d2 = r.norm_squared().max(inf.softening * inf.softening);

            // F = G m_inf m / d^2 and a = F / m, so the body's own mass drops out
            total += normalize_or_zero(&r) * (self.g * inf.m / d2);
        }

        total
    }
}

/// Build the influence set for `bodies[target]`.
/// - primary: empty, it never accelerates
/// - planet: the primary alone
/// - probe: the primary plus every planet
pub fn influence_set(bodies: &[Body], target: usize, params: &Parameters) -> Vec<Influencer> {
    let role = bodies[target].role;
    if role == BodyRole::Primary {
        return Vec::new();
    }

    bodies
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != target)
        .filter_map(|(_, b)| match (role, b.role) {
            (_, BodyRole::Primary) => Some(Influencer {
                x: b.x,
                m: b.m,
                softening: params.primary_softening,
            }),
            (BodyRole::Probe, BodyRole::Secondary(_)) => Some(Influencer {
                x: b.x,
                m: b.m,
                softening: params.secondary_softening,
            }),
            _ => None,
        })
        .collect()
}
