//! Vector helpers on top of nalgebra.
//!
//! nalgebra already provides add/scale/dot/cross/norm; these cover the
//! few operations the engine needs with its own edge-case rules.

use crate::simulation::states::NVec3;

pub fn distance(a: &NVec3, b: &NVec3) -> f64 {
    (b - a).norm()
}

pub fn distance_sq(a: &NVec3, b: &NVec3) -> f64 {
    (b - a).norm_squared()
}

/// Unit vector along `v`, or the zero vector when `v` has no length
pub fn normalize_or_zero(v: &NVec3) -> NVec3 {
    v.try_normalize(0.0).unwrap_or_else(NVec3::zeros)
}

/// Angle of `offset` in the x/z plane, from +x toward +z, in (-pi, pi]
pub fn polar_angle_xz(offset: &NVec3) -> f64 {
    offset.z.atan2(offset.x)
}
