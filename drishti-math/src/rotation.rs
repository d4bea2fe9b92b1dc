//! Rotation matrix ⇄ Tait-Bryan angle conversions.
//!
//! Angles are ordered (yaw, pitch, roll). [`euler_to_rmat`] takes degrees,
//! [`rmat_to_euler`] returns radians.
//!
//! The matrices produced here are the transpose of the textbook
//! `Rz(yaw) · Ry(pitch) · Rx(roll)` layout: the closed-form triples are fed
//! through the column-major constructor. [`rmat_to_euler`] reads the same
//! layout, so the pair round-trips.

use std::f64::consts::PI;

use crate::mat::DMat;

/// 3×3 double-precision matrix.
pub type Mat3 = DMat<3, 3>;

/// Column 3-vector of doubles.
pub type Vec3 = DMat<3, 1>;

/// Below this `|cos(pitch)|` yaw and roll are no longer separable.
const GIMBAL_LOCK_EPSILON: f64 = 1e-9;

/// Extract (yaw, pitch, roll) in radians from a rotation matrix.
///
/// Two candidate decompositions exist for every non-singular rotation
/// (`pitch` and `π − pitch`). The one with the smaller `|yaw| + |pitch| +
/// |roll|` wins. When the second one wins and the first pitch was negative,
/// the pitch is reported as `fmod(−π − pitch_1, π)` so that it stays
/// continuous through negative near-vertical pitch.
///
/// At gimbal lock roll is pinned to zero and the whole residual rotation is
/// reported as yaw.
pub fn rmat_to_euler(r: &Mat3) -> Vec3 {
    let pitch_1 = (-r[(0, 2)]).clamp(-1.0, 1.0).asin();
    let cos_p1 = pitch_1.cos();

    if cos_p1.abs() < GIMBAL_LOCK_EPSILON {
        let yaw = (-r[(1, 0)]).atan2(r[(1, 1)]);
        return Vec3::from_xyz(yaw, pitch_1, 0.0);
    }

    let pitch_2 = PI - pitch_1;
    let cos_p2 = pitch_2.cos();

    let roll_1 = (r[(1, 2)] / cos_p1).atan2(r[(2, 2)] / cos_p1);
    let roll_2 = (r[(1, 2)] / cos_p2).atan2(r[(2, 2)] / cos_p2);
    let yaw_1 = (r[(0, 1)] / cos_p1).atan2(r[(0, 0)] / cos_p1);
    let yaw_2 = (r[(0, 1)] / cos_p2).atan2(r[(0, 0)] / cos_p2);

    let cost_1 = pitch_1.abs() + roll_1.abs() + yaw_1.abs();
    let cost_2 = pitch_2.abs() + roll_2.abs() + yaw_2.abs();

    if cost_1 > cost_2 {
        let pitch = if pitch_1 < 0.0 { (-PI - pitch_1) % PI } else { pitch_2 };
        Vec3::from_xyz(yaw_2, pitch, roll_2)
    } else {
        Vec3::from_xyz(yaw_1, pitch_1, roll_1)
    }
}

/// Build a rotation matrix from (yaw, pitch, roll) in degrees.
pub fn euler_to_rmat(yaw: f64, pitch: f64, roll: f64) -> Mat3 {
    let (s1, c1) = yaw.to_radians().sin_cos();
    let (s2, c2) = pitch.to_radians().sin_cos();
    let (s3, c3) = roll.to_radians().sin_cos();

    Mat3::from_column_major([
        c1 * c2,
        c1 * s2 * s3 - c3 * s1,
        s1 * s3 + c1 * c3 * s2,
        c2 * s1,
        c1 * c3 + s1 * s2 * s3,
        c3 * s1 * s2 - c1 * s3,
        -s2,
        c2 * s3,
        c2 * c3,
    ])
}

/// [`euler_to_rmat`] taking a (yaw, pitch, roll) vector in degrees.
#[inline]
pub fn euler_vec_to_rmat(angles_deg: &Vec3) -> Mat3 {
    euler_to_rmat(angles_deg.x(), angles_deg.y(), angles_deg.z())
}
