//! Frame-driven velocity-Verlet integrator
//!
//! A frame's wall-clock delta is capped, scaled by the time scale into
//! simulated days, then split into equal sub-steps. Each sub-step is a
//! velocity-Verlet update that carries the acceleration forward, so one
//! force evaluation per sub-step is enough.

use super::forces::{influence_set, Acceleration, Influencer};
use super::params::Parameters;
use super::states::{Body, System};

/// Simulated step for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStep {
    pub dt: f64,         // simulated days covered by the frame
    pub substeps: usize, // number of equal Verlet sub-steps
}

impl FrameStep {
    /// - `wall_dt`: real seconds since the previous frame
    /// - `time_scale`: simulated days per real second (may be negative)
    /// - `max_frame_step`: ceiling applied to `wall_dt` before scaling
    /// - `max_substeps`: hard cap on the sub-step count
    pub fn new(wall_dt: f64, time_scale: f64, max_frame_step: f64, max_substeps: usize) -> Self {
        let capped = wall_dt.min(max_frame_step);
        let dt = capped * time_scale;
        Self {
            dt,
            substeps: substep_count(dt, max_substeps),
        }
    }

    /// Length of one sub-step (days); zero when there is nothing to do
    pub fn h(&self) -> f64 {
        if self.substeps == 0 {
            0.0
        } else {
            self.dt / self.substeps as f64
        }
    }
}

/// ceil(|dt|) sub-steps, never more than `max_substeps`
pub fn substep_count(dt: f64, max_substeps: usize) -> usize {
    if dt.is_nan() {
        return 0;
    }
    let n = dt.abs().ceil();
    if n >= max_substeps as f64 {
        max_substeps
    } else {
        n as usize
    }
}

/// Advance one body through a frame using velocity-Verlet sub-steps.
///
/// Per sub-step of length h:
///   x += v h + 1/2 a_old h^2
///   a_new = a(x)
///   v += 1/2 (a_old + a_new) h
///
/// The primary is left untouched. Spin advances at the role's constant
/// rate and does not feed into the orbit.
pub fn verlet_advance<F>(body: &mut Body, step: FrameStep, forces: &F, influencers: &[Influencer])
where
    F: Acceleration + ?Sized,
{
    if body.is_primary() {
        return;
    }

    body.spin += body.role.spin_rate() * step.dt;

    // First frame after build/reset: seed a_old at the initial position
    let mut a_old = match body.a {
        Some(a) => a,
        None => forces.acceleration(&body.x, influencers),
    };

    let h = step.h();
    for _ in 0..step.substeps {
        body.x += body.v * h + a_old * (0.5 * h * h);

        let a_new = forces.acceleration(&body.x, influencers);

        body.v += (a_old + a_new) * (0.5 * h);
        a_old = a_new;
    }

    body.a = Some(a_old);
}

/// Advance every non-primary body in `sys` by one frame, in body order.
/// Each body sees the other bodies' positions as they stand when it is
/// advanced.
pub fn advance_system<F>(sys: &mut System, step: FrameStep, forces: &F, params: &Parameters)
where
    F: Acceleration + ?Sized,
{
    for i in 0..sys.bodies.len() {
        if sys.bodies[i].is_primary() {
            continue;
        }
        let influencers = influence_set(&sys.bodies, i, params);
        verlet_advance(&mut sys.bodies[i], step, forces, &influencers);
    }

    sys.t += step.dt;
}
